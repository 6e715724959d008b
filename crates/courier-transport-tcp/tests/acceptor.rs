//! courier-transport-tcp 的契约测试：在真实回环套接字上回放监听器的
//! 生命周期语义。
//!
//! # 教案式说明
//! - **Why**：监听实现一旦变更，该套件可在 CI 中自动重放“绑定 → 接受 →
//!   关闭/打断”的全部契约，阻止生命周期或超时下发的回归。
//! - **How**：直接驱动 `TcpAcceptor` 与标准库客户端套接字，并发场景使用
//!   `std::thread` 与通道收集结果，所有等待均设上界以避免悬挂。
//! - **What**：每个测试返回 `()`；若断言失败则 panic 并附带阶段性上下文。

use courier_transport::{TransportAcceptor, TransportError, codes};
use courier_transport_tcp::TcpAcceptor;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn loopback() -> courier_transport::TransportSocketAddr {
    let addr: SocketAddr = "127.0.0.1:0".parse().expect("parse addr");
    courier_transport::TransportSocketAddr::from(addr)
}

/// 通过能力契约驱动一次接受，验证调用方可以只面向 trait 编程。
fn accept_one<A: TransportAcceptor>(acceptor: &A) -> courier_transport::Result<A::Connection> {
    acceptor.listen()?;
    acceptor.accept()
}

/// 端到端闭环：绑定临时端口、客户端建连、接受后字节双向往返。
///
/// - **Why**：确认监听器交付的是一条活的、可用的连接，且超时已下发。
/// - **How**：客户端先建连（连接驻留在 backlog），随后 `accept` 立即返回；
///   两个方向各写读一次。
/// - **What**：往返字节一致、地址元数据齐备、读超时等于构造时配置值。
#[test]
fn accept_hands_over_live_connection_with_timeout_applied() {
    let timeout = Some(Duration::from_millis(300));
    let acceptor =
        TcpAcceptor::bind_with_timeout(loopback(), timeout).expect("bind acceptor");
    let target = SocketAddr::from(acceptor.local_addr());

    let mut client = TcpStream::connect(target).expect("client connect");
    let mut channel = accept_one(&acceptor).expect("accept connection");

    assert_eq!(channel.read_timeout().expect("query timeout"), timeout);
    assert!(channel.peer_addr().is_some(), "接受的连接应携带对端地址");
    assert!(channel.local_addr().is_some(), "接受的连接应携带本地地址");

    client.write_all(b"hello").expect("client write");
    let mut buf = [0u8; 5];
    channel.read_exact(&mut buf).expect("channel read");
    assert_eq!(&buf, b"hello");

    channel.write_all(b"world").expect("channel write");
    let mut reply = [0u8; 5];
    client.read_exact(&mut reply).expect("client read");
    assert_eq!(&reply, b"world");

    acceptor.close();
}

/// 已被占用的地址上绑定必须失败，并携带目标地址与稳定错误码。
///
/// - **Why**：绑定失败的 Acceptor 视同从未构造，调用方依赖 `Bind` 分支
///   直接放弃实例。
/// - **How**：先用一个监听器占住端口，再在同端口上二次绑定。
/// - **What**：错误为 `Bind`，`code()` 为 `courier.transport.bind_failed`，
///   消息中包含冲突端口。
#[test]
fn binding_an_occupied_address_fails_with_bind_error() {
    let holder = TcpAcceptor::bind(loopback()).expect("bind holder");
    let occupied = holder.local_addr();

    let err = TcpAcceptor::bind(occupied).expect_err("second bind must fail");
    assert_eq!(err.code(), codes::BIND_FAILED);
    match err {
        TransportError::Bind { addr, .. } => assert_eq!(addr, occupied),
        other => panic!("expected Bind error, got {other:?}"),
    }

    holder.close();
}

/// 关闭后的生命周期契约：`accept` 返回 `NotOpen`，重复关闭与 `listen`
/// 均为安全的空操作。
///
/// - **Why**：`已关闭` 是终态，服务循环依赖 `NotOpen` 退出；重复关闭不得
///   panic 或悬挂。
/// - **How**：正常关闭后依次调用 `accept`、`close`、`listen`。
/// - **What**：`accept` 报 `NotOpen` 且码值稳定，其余调用静默成功。
#[test]
fn accept_after_close_reports_not_open_and_teardown_is_idempotent() {
    let acceptor = TcpAcceptor::bind(loopback()).expect("bind acceptor");
    acceptor.close();

    let err = acceptor.accept().expect_err("accept after close must fail");
    assert!(matches!(err, TransportError::NotOpen));
    assert_eq!(err.code(), codes::NOT_OPEN);

    acceptor.close();
    acceptor
        .listen()
        .expect("listen on closed acceptor must stay a no-op");
}

/// 并发正确性：另一线程的 `interrupt` 必须在有限时间内解除阻塞中的
/// `accept`，且错误归因为主动关闭。
///
/// - **Why**：这是本组件唯一的并发契约；若退化为悬挂，停机流程将被接受
///   线程卡死。
/// - **How**：工作线程在无任何待连接的监听器上阻塞 `accept`，主线程稍后
///   `interrupt`，经通道带超时收集结果。
/// - **What**：阻塞调用在 5 秒上界内返回 `Closed`。
#[test]
fn interrupt_from_another_thread_unblocks_accept() {
    let acceptor = Arc::new(TcpAcceptor::bind(loopback()).expect("bind acceptor"));
    acceptor.listen().expect("listen");

    let (tx, rx) = mpsc::channel();
    let worker = {
        let acceptor = Arc::clone(&acceptor);
        thread::spawn(move || {
            tx.send(acceptor.accept().map(drop))
                .expect("report accept outcome");
        })
    };

    // 留出时间让工作线程真正阻塞在内核 accept 上
    thread::sleep(Duration::from_millis(150));
    acceptor.interrupt();

    let outcome = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("blocked accept must return after interrupt");
    let err = outcome.expect_err("interrupted accept must fail");
    assert!(matches!(err, TransportError::Closed), "got {err:?}");
    assert_eq!(err.code(), codes::CLOSED);

    worker.join().expect("join worker");
}

/// 外部句柄接管路径：不重新绑定即可接受连接，超时同样下发。
///
/// - **Why**：需要先行设置底层套接字选项的调用方依赖该构造路径。
/// - **How**：用标准库监听器自行绑定，再交由 `from_std_listener` 接管。
/// - **What**：接受成功、字节可往返、读超时等于配置值。
#[test]
fn external_listener_is_adopted_without_rebinding() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind std listener");
    let target = listener.local_addr().expect("local addr");

    let timeout = Some(Duration::from_millis(500));
    let acceptor =
        TcpAcceptor::from_std_listener(listener, timeout).expect("adopt listener");
    assert_eq!(SocketAddr::from(acceptor.local_addr()), target);

    let mut client = TcpStream::connect(target).expect("client connect");
    let mut channel = accept_one(&acceptor).expect("accept connection");
    assert_eq!(channel.read_timeout().expect("query timeout"), timeout);

    client.write_all(b"ok").expect("client write");
    let mut buf = [0u8; 2];
    channel.read_exact(&mut buf).expect("channel read");
    assert_eq!(&buf, b"ok");

    acceptor.close();
}

/// 超时下发的行为面验证：对端静默时，读操作在配置时长后以超时类错误返回。
///
/// - **Why**：超时的意义在于让后续读操作有界阻塞，仅回读配置值不足以
///   证明生效。
/// - **How**：客户端建连后不发送任何字节，在通道上执行一次读。
/// - **What**：读失败且错误种类为 `TimedOut`/`WouldBlock`（平台差异）。
#[test]
fn client_timeout_bounds_reads_on_a_silent_peer() {
    let acceptor =
        TcpAcceptor::bind_with_timeout(loopback(), Some(Duration::from_millis(200)))
            .expect("bind acceptor");
    let target = SocketAddr::from(acceptor.local_addr());

    let _client = TcpStream::connect(target).expect("client connect");
    let mut channel = accept_one(&acceptor).expect("accept connection");

    let mut buf = [0u8; 1];
    let err = channel
        .read(&mut buf)
        .expect_err("read on silent peer must time out");
    assert!(
        matches!(
            err.kind(),
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
        ),
        "unexpected error kind: {err:?}"
    );

    acceptor.close();
}
