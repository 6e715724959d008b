use crate::{Result, TransportSocketAddr};
use std::time::Duration;

/// 半关闭方向。
///
/// # 契约说明
/// - `Read` 关闭读半部，`Write` 关闭写半部，`Both` 双向关闭；
/// - 具体语义对齐 `std::net::Shutdown`，由实现映射到底层套接字。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownDirection {
    Read,
    Write,
    Both,
}

/// 已接受连接的最小能力接口。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 监听器在返回连接前需要把构造时配置的客户端超时下发到连接上，本契约
///   刻画的正是这一“超时可下发”的最小能力；
/// - 地址元数据用于日志与排障，避免上层再去触碰底层套接字。
///
/// ## 契约说明（What）
/// - `set_read_timeout`：设置后续读操作的最长阻塞时长；`None` 表示无限期
///   阻塞（对应配置值 0）；
/// - `read_timeout`：回读内核当前生效的超时值，用于验证下发结果；
/// - `peer_addr`/`local_addr`：结构化地址元数据，实现无该信息时返回 `None`。
///
/// ## 风险提示（Trade-offs）
/// - 帧化、读写缓冲等字节流语义不属于本契约；阻塞实现通过
///   `std::io::{Read, Write}` 在具体类型上表达字节 I/O；
/// - 超时粒度与取整行为由平台决定，断言时需预留余量。
pub trait TransportConnection: Send + 'static {
    /// 设置后续读操作的超时，`None` 表示无限期阻塞。
    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()>;

    /// 查询当前生效的读超时。
    fn read_timeout(&self) -> Result<Option<Duration>>;

    /// 读取对端地址。
    fn peer_addr(&self) -> Option<TransportSocketAddr>;

    /// 读取本地地址。
    fn local_addr(&self) -> Option<TransportSocketAddr>;

    /// 根据方向执行半关闭。
    fn shutdown(&self, direction: ShutdownDirection) -> Result<()>;
}
