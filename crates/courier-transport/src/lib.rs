#![deny(unsafe_code)]
#![doc = "courier-transport: 监听侧传输契约的统一抽象层。"]
#![doc = ""]
#![doc = "== 使命概述 =="]
#![doc = "- **Why**：为 Courier 的 TCP 及未来其他监听实现提供共同语言，确保上层服务循环在替换监听实现时无需重新编译调用方逻辑。"]
#![doc = "- **What**：定义 `TransportAcceptor`（监听 → 接受 → 关闭）与 `TransportConnection`（超时下发、地址元数据）两个核心 trait，并提供 `TransportSocketAddr` 地址结构与 `TransportError` 错误域。"]
#![doc = "- **How**：契约面向阻塞式单次 accept 原语设计，所有实现仅需依赖本 crate 即可遵循统一的生命周期与错误分类。"]

pub mod addr;
pub mod connection;
pub mod error;
pub mod listener;

pub use addr::TransportSocketAddr;
pub use connection::{ShutdownDirection, TransportConnection};
pub use error::{OperationKind, Result, TransportError, codes};
pub use listener::TransportAcceptor;
