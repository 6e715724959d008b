use core::fmt;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};

/// `TransportSocketAddr` 为各监听实现提供统一的 Socket 地址表达。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - **统一抽象**：在 TCP 乃至未来的其他监听介质之间提供一致的地址结构，
///   避免契约层直接依赖 `std::net::SocketAddr` 的具体形态。
/// - **可扩展性**：保留 `non_exhaustive`，为未来扩展（如 Unix Domain Socket）
///   预留空间。
///
/// ## 体系定位（Architecture）
/// - 属于 `courier-transport` 基础层，被 Acceptor/Connection 接口与具体实现
///   共同依赖；Acceptor 的绑定地址在构造后即以该类型固化。
///
/// ## 合同（What）
/// - `V4` 与 `V6` 分别表示 IPv4/IPv6，端口号使用主机序 `u16`。
/// - `Display`/`Debug` 提供稳定字符串格式，适合日志与错误消息使用。
/// - **后置条件**：枚举值保持不可变；格式化输出不变。
///
/// ## 设计权衡与风险（Trade-offs）
/// - 目前未对 IPv6 进行零压缩优化，优先保障可读性；若需最短表示，可在上层缓存。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum TransportSocketAddr {
    /// IPv4 地址。
    V4 { addr: [u8; 4], port: u16 },
    /// IPv6 地址。
    V6 { addr: [u16; 8], port: u16 },
}

impl TransportSocketAddr {
    /// 读取端口号。
    pub fn port(&self) -> u16 {
        match self {
            Self::V4 { port, .. } | Self::V6 { port, .. } => *port,
        }
    }
}

impl fmt::Display for TransportSocketAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportSocketAddr::V4 { addr, port } => write!(
                f,
                "{}.{}.{}.{}:{}",
                addr[0], addr[1], addr[2], addr[3], port
            ),
            TransportSocketAddr::V6 { addr, port } => {
                let segments: Vec<String> = addr
                    .iter()
                    .map(|segment| format!("{:x}", segment))
                    .collect();
                write!(f, "[{}]:{}", segments.join(":"), port)
            }
        }
    }
}

impl From<SocketAddr> for TransportSocketAddr {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => Self::V4 {
                addr: v4.ip().octets(),
                port: v4.port(),
            },
            SocketAddr::V6(v6) => Self::V6 {
                addr: v6.ip().segments(),
                port: v6.port(),
            },
        }
    }
}

impl From<TransportSocketAddr> for SocketAddr {
    fn from(addr: TransportSocketAddr) -> Self {
        match addr {
            TransportSocketAddr::V4 { addr, port } => {
                SocketAddr::new(IpAddr::from(addr), port)
            }
            TransportSocketAddr::V6 { addr, port } => {
                SocketAddr::new(IpAddr::from(Ipv6Addr::from(addr)), port)
            }
        }
    }
}
