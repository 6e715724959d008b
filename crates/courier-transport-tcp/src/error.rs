use courier_transport::{OperationKind, TransportError, TransportSocketAddr};
use std::io;

pub(crate) const ACCEPT: OperationKind = OperationKind {
    code: "courier.transport.tcp.accept_failed",
    message: "tcp accept",
};
pub(crate) const LOCAL_ADDR: OperationKind = OperationKind {
    code: "courier.transport.tcp.local_addr_failed",
    message: "tcp local_addr",
};
pub(crate) const SHUTDOWN: OperationKind = OperationKind {
    code: "courier.transport.tcp.shutdown_failed",
    message: "tcp shutdown",
};
pub(crate) const CONFIGURE: OperationKind = OperationKind {
    code: "courier.transport.tcp.configure_failed",
    message: "tcp configure",
};

/// 将 IO 错误映射为契约级错误，并记录失败的操作种类。
pub(crate) fn map_io_error(kind: OperationKind, error: io::Error) -> TransportError {
    TransportError::Io {
        op: kind,
        source: error,
    }
}

/// 构造绑定失败错误，携带目标地址。
pub(crate) fn bind_error(addr: TransportSocketAddr, error: io::Error) -> TransportError {
    TransportError::Bind {
        addr,
        source: error,
    }
}

/// 构造“句柄缺失”错误。
pub(crate) fn not_open_error() -> TransportError {
    TransportError::NotOpen
}

/// 构造“阻塞期间被主动关闭”错误。
pub(crate) fn closed_error() -> TransportError {
    TransportError::Closed
}
