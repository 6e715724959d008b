#![doc = r#"
# courier-transport-tcp

## 设计动机（Why）
- **定位**：该 crate 提供 Courier 在阻塞式标准库套接字之上的最小 TCP 监听
  实现，封装绑定、接受就绪、阻塞接受与并发关闭等底层细节。
- **架构角色**：作为监听实现层的基础积木，对接 `courier-transport` 的能力
  契约与错误域，为未来其他介质的监听实现提供语义参照。
- **设计理念**：强调“生命周期显式”与“错误分类”，绑定与接受失败均映射为
  结构化的 [`TransportError`](courier_transport::TransportError)，有序停机
  通过专门的 `Closed` 语义与意外故障区分。

## 核心契约（What）
- **输入条件**：调用方自备接受线程并以循环驱动 `accept`，本 crate 不引入
  任何内部线程或多路复用；
- **输出保障**：`accept` 每次成功调用恰好产出一条连接，且在返回前已把
  构造时配置的客户端读超时下发到连接上；
- **并发保证**：另一线程调用 `close`/`interrupt` 能在有限时间内解除当前
  线程阻塞中的 `accept`。

## 实现策略（How）
- **句柄治理**：监听句柄以 `Arc<socket2::Socket>` 存放在 `parking_lot`
  互斥槽位中；接受路径只在“读取并克隆引用”的瞬间持锁，绝不跨阻塞调用
  持锁；
- **关闭解锁**：关闭路径先置位原子标志，再对同一内核套接字执行
  `shutdown(Both)`，使并发阻塞的 accept 立即以错误返回并被归因为主动关闭；
- **超时下发**：客户端超时通过 `TcpStream::set_read_timeout` 在连接包装
  阶段一次性落地。

## 风险与考量（Trade-offs）
- **平台依赖**：“shutdown 解除并发 accept 阻塞”依赖平台语义，主流平台
  （Linux/macOS/Windows）均满足；
- **接受侧无超时**：`listen` 显式清除接受侧超时，阻塞无上界，终止只能经由
  `close`/`interrupt`，这是规格化的设计而非遗漏。
"#]

mod channel;
mod error;
mod listener;

pub use channel::{TcpChannel, TcpChannelParts};
pub use listener::TcpAcceptor;
