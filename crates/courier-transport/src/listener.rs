use crate::{Result, TransportConnection, TransportSocketAddr};

/// 统一的阻塞式监听器接口。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 在 TCP 及未来其他监听实现之间共享统一签名，便于服务循环在替换协议时
///   无需改动接受逻辑；
/// - 将“进入接受就绪 → 阻塞接受 → 关闭/打断”纳入一个能力集合，调用方对
///   能力集合而非具体类型或继承层次编程。
///
/// ## 架构定位（Architecture）
/// - 监听器位于服务循环与具体介质实现之间，负责产出 [`TransportConnection`]；
/// - 本契约刻意保持阻塞语义：`accept` 每次调用最多产出一条连接，由外部
///   服务循环驱动，不引入任何内部线程或多路复用。
///
/// ## 契约说明（What）
/// - `listen` 使监听句柄进入接受就绪模式（accept 无限期阻塞，不设接受侧
///   超时）；句柄缺失时为静默空操作，以容忍外部托管或已关闭状态下的调用
///   顺序——该容忍是显式设计决策，而非继承而来的缺省行为；
/// - `accept` 阻塞当前线程直到有连接到达或句柄被关闭；成功时返回已应用
///   客户端超时的连接对象；句柄缺失时返回
///   [`TransportError::NotOpen`](crate::TransportError::NotOpen)；
/// - `close` 幂等释放监听句柄，释放失败只记录诊断，不向调用方传播；
/// - `interrupt` 供另一线程触发，效果与 `close` 相同，依赖平台“关闭监听
///   套接字可解除并发 accept 阻塞”的保证；
/// - `scheme` 返回协议标识字符串（例如 `"tcp"`）。
///
/// ## 风险提示（Trade-offs）
/// - `accept` 的阻塞没有超时上界，终止只能通过另一线程的 `close`/
///   `interrupt` 达成；实现必须保证该交互不会无限挂起；
/// - 实现不得在阻塞的 accept 调用期间持有句柄锁，否则关闭路径会被接受
///   路径串行化。
pub trait TransportAcceptor: Send + Sync + 'static {
    /// 监听器生成的连接类型。
    type Connection: TransportConnection;

    /// 返回协议标识（例如 `"tcp"`）。
    fn scheme(&self) -> &'static str;

    /// 查询监听器实际绑定的地址。
    fn local_addr(&self) -> Result<TransportSocketAddr>;

    /// 使监听句柄进入接受就绪模式。
    fn listen(&self) -> Result<()>;

    /// 阻塞接受一条入站连接。
    fn accept(&self) -> Result<Self::Connection>;

    /// 幂等关闭监听句柄。
    fn close(&self);

    /// 从另一线程打断阻塞中的 `accept`，效果与 [`close`](Self::close) 相同。
    fn interrupt(&self) {
        self.close();
    }
}
