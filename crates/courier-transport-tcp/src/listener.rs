use crate::{
    channel::TcpChannel,
    error::{self, map_io_error},
};
use courier_transport::{Result, TransportAcceptor, TransportSocketAddr};
use parking_lot::Mutex;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Shutdown, SocketAddr, TcpListener as StdTcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const ACCEPT_BACKLOG: i32 = 128;

/// 阻塞式 TCP 监听器，Courier 监听契约在标准库套接字上的落地。
///
/// # 教案式注释
///
/// ## 意图 (Why)
/// - 在不暴露 `socket2`/标准库具体类型的前提下，提供“绑定 → 接受就绪 →
///   阻塞接受 → 关闭”的最小能力，让服务循环以契约管理生命周期与错误分类；
/// - 把构造时配置的客户端读超时在每次接受时下发到连接上，调用方拿到的
///   连接即刻具备超时保护。
///
/// ## 逻辑 (How)
/// - 监听句柄以 `Arc<Socket>` 存放在互斥槽位中；`accept` 只在读取并克隆
///   引用的瞬间持锁，阻塞等待发生在锁外；
/// - `close`/`interrupt` 先置位原子关闭标志，再对同一内核套接字执行
///   `shutdown(Both)`，槽位仅在内核层关闭请求发出后才清空——阻塞中的
///   `accept` 因此观察到真实的关闭事件，而不是句柄缺失的竞态；
/// - 接受成功后经 [`TcpChannel::from_parts`] 包装并写入客户端读超时。
///
/// ## 契约 (What)
/// - `bind`/`bind_with_timeout`：分配新句柄、开启地址复用并绑定；失败返回
///   携带目标地址的 [`TransportError::Bind`](courier_transport::TransportError::Bind)，
///   不保留半初始化句柄；
/// - `from_std_listener`：接管外部已绑定的句柄，不执行绑定，供需要先行
///   设置底层套接字选项的调用方使用；
/// - `accept`：句柄缺失时返回
///   [`TransportError::NotOpen`](courier_transport::TransportError::NotOpen)；
///   阻塞期间被关闭时返回
///   [`TransportError::Closed`](courier_transport::TransportError::Closed)；
///   其余失败返回 `Io`；
/// - **状态机**：`未绑定 → 已绑定（就绪）→ 已关闭`，关闭是终态，同一实例
///   不会重新进入已绑定状态。
///
/// ## 注意事项 (Trade-offs)
/// - 地址复用只开启 `SO_REUSEADDR`（规避重启进程时的 2MSL 残留），不开启
///   `SO_REUSEPORT`，同地址的并存监听仍会在绑定时失败；
/// - 关闭路径摘除自身引用后，内核句柄在最后一个在途 `accept` 返回时才真正
///   释放；`shutdown` 已先行解除这些阻塞，窗口极短。
#[derive(Debug)]
pub struct TcpAcceptor {
    handle: Mutex<Option<Arc<Socket>>>,
    closed: AtomicBool,
    local_addr: TransportSocketAddr,
    client_timeout: Option<Duration>,
}

impl TcpAcceptor {
    /// 绑定到指定地址，接受的连接不设读超时。
    pub fn bind(addr: TransportSocketAddr) -> Result<Self> {
        Self::bind_with_timeout(addr, None)
    }

    /// 绑定到指定地址，并记录每条接受连接应获得的读超时。
    ///
    /// # 契约说明
    /// - `client_timeout` 为 `None` 或零时长时表示不限；该值在构造后固化，
    ///   对每条接受的连接施加一次且仅一次；
    /// - 分配、设置地址复用或绑定任一步失败都会返回 `Bind` 错误，此时不
    ///   保留任何句柄，实例视同从未构造。
    pub fn bind_with_timeout(
        addr: TransportSocketAddr,
        client_timeout: Option<Duration>,
    ) -> Result<Self> {
        let socket_addr = SocketAddr::from(addr);
        let socket =
            allocate_listener(socket_addr).map_err(|err| error::bind_error(addr, err))?;
        let resolved = socket
            .local_addr()
            .map_err(|err| error::bind_error(addr, err))?;
        let local_addr = resolved
            .as_socket()
            .map(TransportSocketAddr::from)
            .unwrap_or(addr);
        Ok(Self::from_socket(socket, local_addr, client_timeout))
    }

    /// 接管外部已绑定的监听句柄，不执行任何绑定动作。
    ///
    /// # 契约说明
    /// - 该路径供需要先行配置底层套接字选项的调用方使用，句柄所有权完全
    ///   转移给本实例；
    /// - 查询本地地址失败时返回 `Io` 错误，句柄随错误路径一并释放。
    pub fn from_std_listener(
        listener: StdTcpListener,
        client_timeout: Option<Duration>,
    ) -> Result<Self> {
        let local = listener
            .local_addr()
            .map_err(|err| map_io_error(error::LOCAL_ADDR, err))?;
        Ok(Self::from_socket(
            Socket::from(listener),
            TransportSocketAddr::from(local),
            client_timeout,
        ))
    }

    fn from_socket(
        socket: Socket,
        local_addr: TransportSocketAddr,
        client_timeout: Option<Duration>,
    ) -> Self {
        Self {
            handle: Mutex::new(Some(Arc::new(socket))),
            closed: AtomicBool::new(false),
            local_addr,
            // 零时长等价于“不限”，统一归一化为 None
            client_timeout: client_timeout.filter(|timeout| !timeout.is_zero()),
        }
    }

    /// 返回监听器实际绑定的地址（绑定端口 0 时为内核解析后的端口）。
    pub fn local_addr(&self) -> TransportSocketAddr {
        self.local_addr
    }

    /// 读取将下发给每条接受连接的读超时。
    pub fn client_timeout(&self) -> Option<Duration> {
        self.client_timeout
    }

    /// 使监听句柄进入接受就绪模式：`accept` 无限期阻塞，不设接受侧超时。
    ///
    /// # 契约说明
    /// - 句柄缺失时为静默空操作，容忍外部托管或已关闭状态下的调用顺序；
    /// - 清除接受侧超时失败只记录告警，监听器保持可用——就绪配置失败不
    ///   构成致命错误。
    pub fn listen(&self) -> Result<()> {
        let guard = self.handle.lock();
        if let Some(socket) = guard.as_ref()
            && let Err(err) = clear_accept_timeout(socket)
        {
            tracing::warn!(error = %err, "could not clear accept timeout on listening socket");
        }
        Ok(())
    }

    /// 阻塞接受一条入站连接，成功时返回已应用读超时的 [`TcpChannel`]。
    ///
    /// # 契约说明
    /// - 每次成功调用恰好产出一条连接，由外部服务循环反复驱动；
    /// - 句柄缺失（已关闭或从未绑定）时返回 `NotOpen`；
    /// - 阻塞期间另一线程调用 [`close`](Self::close)/[`interrupt`](Self::interrupt)
    ///   时，本调用在有限时间内以 `Closed` 返回；
    /// - 其余底层失败返回 `Io`，监听器保持原状，调用方可自行决定是否继续。
    pub fn accept(&self) -> Result<TcpChannel> {
        let socket = {
            let guard = self.handle.lock();
            match guard.as_ref() {
                Some(socket) => Arc::clone(socket),
                None => return Err(error::not_open_error()),
            }
        };
        // 锁已释放；阻塞等待期间关闭路径可自由推进
        match socket.accept() {
            Ok((stream, peer)) => {
                let stream = TcpStream::from(stream);
                let local = stream
                    .local_addr()
                    .map_err(|err| map_io_error(error::ACCEPT, err))?;
                TcpChannel::from_parts(
                    stream,
                    Some(TransportSocketAddr::from(local)),
                    peer.as_socket().map(TransportSocketAddr::from),
                    self.client_timeout,
                )
            }
            Err(err) => {
                if self.closed.load(Ordering::Acquire) {
                    Err(error::closed_error())
                } else {
                    Err(map_io_error(error::ACCEPT, err))
                }
            }
        }
    }

    /// 幂等关闭监听句柄，并解除其他线程阻塞中的 `accept`。
    ///
    /// # 契约说明
    /// - 关闭标志先于内核层 `shutdown` 置位，阻塞中的 `accept` 随后观察到
    ///   的错误因此能归因为主动关闭；
    /// - 槽位仅在内核层关闭请求发出后才清空；
    /// - `shutdown` 失败只记录告警，逻辑状态无论如何进入已关闭——关闭是
    ///   尽力而为的终态动作；
    /// - 重复调用为空操作。
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        let mut guard = self.handle.lock();
        if let Some(socket) = guard.as_ref()
            && let Err(err) = socket.shutdown(Shutdown::Both)
        {
            tracing::warn!(error = %err, "could not shut down listening socket");
        }
        *guard = None;
    }

    /// 从另一线程打断阻塞中的 `accept`，实现与 [`close`](Self::close) 相同。
    pub fn interrupt(&self) {
        self.close();
    }
}

impl TransportAcceptor for TcpAcceptor {
    type Connection = TcpChannel;

    fn scheme(&self) -> &'static str {
        "tcp"
    }

    fn local_addr(&self) -> Result<TransportSocketAddr> {
        Ok(TcpAcceptor::local_addr(self))
    }

    fn listen(&self) -> Result<()> {
        TcpAcceptor::listen(self)
    }

    fn accept(&self) -> Result<TcpChannel> {
        TcpAcceptor::accept(self)
    }

    fn close(&self) {
        TcpAcceptor::close(self)
    }

    fn interrupt(&self) {
        TcpAcceptor::interrupt(self)
    }
}

fn allocate_listener(addr: SocketAddr) -> io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    // 规避进程重启时 2MSL 残留导致的重绑失败
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(ACCEPT_BACKLOG)?;
    Ok(socket)
}

fn clear_accept_timeout(socket: &Socket) -> io::Result<()> {
    socket.set_nonblocking(false)?;
    socket.set_read_timeout(None)
}

#[allow(dead_code)]
fn _assert_tcp_transport_acceptor()
where
    TcpAcceptor: TransportAcceptor<Connection = TcpChannel>,
{
}
