use crate::TransportSocketAddr;
use core::fmt;
use std::io;
use thiserror::Error;

/// `Result` 为契约层统一的返回值别名，默认错误类型为 [`TransportError`]。
///
/// # 设计背景（Why）
/// - 监听实现与调用方共享同一错误封装模型，便于日志聚合时直接识别错误域；
/// - 避免在各处重复书写 `Result<_, TransportError>` 样板代码。
///
/// # 使用方式（How）
/// - 与 `core::result::Result` 完全等价，可直接与 `?` 运算符、模式匹配协同工作；
/// - 若实现需要返回自定义错误，可在第二个泛型参数中显式指定。
pub type Result<T, E = TransportError> = core::result::Result<T, E>;

/// 描述一次底层操作对应的稳定错误码与默认文案。
///
/// # 契约说明
/// - `code` 遵循 `<领域>.<语义>` 命名约定，供日志与指标系统稳定识别；
/// - `message` 为操作的简短英文描述，拼入错误消息前缀。
#[derive(Clone, Copy, Debug)]
pub struct OperationKind {
    pub code: &'static str,
    pub message: &'static str,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// 监听侧传输层的核心错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：聚合绑定、接受、关闭等关键路径的异常，让调用方按枚举分支
///   决策，而不是解析消息文本；细粒度变体帮助服务循环快速区分“该停止”与
///   “该报警”。
/// - **契约 (What)**：
///   - 所有变体均实现 `Send + Sync + 'static`，可安全跨线程传播；
///   - 派生 [`thiserror::Error`]，底层 I/O 原因通过 `source()` 链路暴露；
///   - [`code`](Self::code) 返回稳定错误码，供观测系统聚合。
/// - **设计权衡 (Trade-offs)**：`Bind` 携带目标地址以便排障，代价是错误体积
///   略增；`Closed` 与 `Io` 的区分依赖实现方在关闭路径上显式标记，契约层
///   只约定语义。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// 构造阶段分配或绑定监听套接字失败。
    ///
    /// - **意图 (Why)**：绑定失败意味着 Acceptor 从未可用，调用方应直接放弃
    ///   该实例而非重试 `accept`。
    /// - **契约 (What)**：`addr` 为目标绑定地址；`source` 为底层 I/O 原因。
    #[error("could not bind listening socket on {addr}: {source}")]
    Bind {
        addr: TransportSocketAddr,
        #[source]
        source: io::Error,
    },

    /// 在没有监听句柄的状态下调用 `accept`。
    ///
    /// - **意图 (Why)**：标记“已关闭或从未成功绑定”，服务循环收到后应退出
    ///   接受循环。
    #[error("no underlying listening socket")]
    NotOpen,

    /// 监听句柄在 `accept` 阻塞期间被主动关闭。
    ///
    /// - **意图 (Why)**：将“另一线程触发的有序停机”与意外 I/O 故障区分开，
    ///   调用方无需检查消息文本即可静默收尾。
    /// - **风险 (Trade-offs)**：该变体依赖实现方在关闭前置位标记；若实现
    ///   遗漏，关闭会退化为 `Io`，语义仍然安全，只是损失区分度。
    #[error("listening socket closed while accept was in flight")]
    Closed,

    /// 其余底层 I/O 失败，携带失败的操作种类与原因。
    #[error("{op} failed: {source}")]
    Io {
        op: OperationKind,
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    /// 获取稳定错误码。
    ///
    /// # 返回契约
    /// - `Bind`/`NotOpen`/`Closed` 返回 [`codes`] 模块中的固定码值；
    /// - `Io` 返回构造时记录的操作码，具体实现 crate 决定其取值。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bind { .. } => codes::BIND_FAILED,
            Self::NotOpen => codes::NOT_OPEN,
            Self::Closed => codes::CLOSED,
            Self::Io { op, .. } => op.code,
        }
    }
}

/// 契约层内置的错误码常量集合，确保可观测性系统具有稳定识别符。
pub mod codes {
    /// 监听套接字绑定失败。
    pub const BIND_FAILED: &str = "courier.transport.bind_failed";
    /// 监听句柄缺失（已关闭或从未绑定）。
    pub const NOT_OPEN: &str = "courier.transport.not_open";
    /// 监听句柄在 accept 阻塞期间被主动关闭。
    pub const CLOSED: &str = "courier.transport.closed";
}

const _: fn() = || {
    fn assert_error_traits<T: std::error::Error + Send + Sync + 'static>() {}

    assert_error_traits::<TransportError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    /// 验证各变体的稳定错误码与 `source()` 链路符合契约。
    #[test]
    fn codes_and_source_chain_are_stable() {
        let addr = TransportSocketAddr::V4 {
            addr: [127, 0, 0, 1],
            port: 9090,
        };
        let bind = TransportError::Bind {
            addr,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert_eq!(bind.code(), codes::BIND_FAILED);
        assert!(bind.source().is_some(), "Bind 必须暴露底层原因");
        assert!(bind.to_string().contains("127.0.0.1:9090"));

        assert_eq!(TransportError::NotOpen.code(), codes::NOT_OPEN);
        assert!(TransportError::NotOpen.source().is_none());

        assert_eq!(TransportError::Closed.code(), codes::CLOSED);

        let op = OperationKind {
            code: "courier.transport.test.op_failed",
            message: "test op",
        };
        let io_err = TransportError::Io {
            op,
            source: io::Error::from(io::ErrorKind::BrokenPipe),
        };
        assert_eq!(io_err.code(), "courier.transport.test.op_failed");
        assert!(io_err.to_string().starts_with("test op failed"));
    }
}
