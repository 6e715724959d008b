use crate::error::{CONFIGURE, SHUTDOWN, map_io_error};
use courier_transport::{Result, ShutdownDirection, TransportConnection, TransportSocketAddr};
use std::io::{self, Read, Write};
use std::net::{Shutdown as StdShutdown, TcpStream};
use std::time::Duration;

/// TCP 通道的最小阻塞实现，封装已接受连接与其地址元数据。
///
/// # 教案式注释
///
/// ## 意图 (Why)
/// - 为上层提供对单个已接受 TCP 连接的直接控制，同时承接监听器在返回前
///   下发的客户端读超时；
/// - 在无须触碰底层套接字的情况下，完成超时调整、半关闭与地址查询。
///
/// ## 逻辑 (How)
/// - 内部直接持有 `std::net::TcpStream`；字节 I/O 通过
///   `std::io::{Read, Write}` 表达，`&TcpChannel` 亦可读写，与标准库对
///   `&TcpStream` 的处理一致；
/// - 读超时经 `TcpStream::set_read_timeout` 写入内核，失败被映射为
///   配置操作的结构化错误。
///
/// ## 契约 (What)
/// - `set_read_timeout`/`read_timeout`：下发与回读读超时，`None` 表示
///   无限期阻塞；
/// - `shutdown`：执行半关闭；
/// - `peer_addr`/`local_addr`：提供结构化的地址元数据。
///
/// ## 注意事项 (Trade-offs)
/// - 帧化与读写缓冲不属于本类型，由上层字节流抽象负责；
/// - 平台会对超时取整，断言实际生效值时需预留精度余量。
#[derive(Debug)]
pub struct TcpChannel {
    stream: TcpStream,
    local_addr: Option<TransportSocketAddr>,
    peer_addr: Option<TransportSocketAddr>,
}

/// 将通道拆解为裸 `TcpStream` 与地址元数据的结果结构。
///
/// # 契约（What）
/// - `stream`：原始标准库 `TcpStream`；
/// - `local_addr`/`peer_addr`：接受时记录的地址元数据；
/// - **后置条件**：所有权完全转移至该结构体，原通道不再可用。
#[derive(Debug)]
pub struct TcpChannelParts {
    pub stream: TcpStream,
    pub local_addr: Option<TransportSocketAddr>,
    pub peer_addr: Option<TransportSocketAddr>,
}

impl TcpChannel {
    /// 由已接受的流构造通道，并一次性下发读超时。
    ///
    /// # 契约说明
    /// - `read_timeout` 为 `Some` 时写入内核，`None` 保持无限期阻塞；
    /// - 超时下发失败时返回配置操作的
    ///   [`TransportError::Io`](courier_transport::TransportError::Io)，
    ///   不返回半初始化的通道。
    pub(crate) fn from_parts(
        stream: TcpStream,
        local_addr: Option<TransportSocketAddr>,
        peer_addr: Option<TransportSocketAddr>,
        read_timeout: Option<Duration>,
    ) -> Result<Self> {
        stream
            .set_read_timeout(read_timeout)
            .map_err(|err| map_io_error(CONFIGURE, err))?;
        Ok(Self {
            stream,
            local_addr,
            peer_addr,
        })
    }

    /// 设置后续读操作的超时，`None` 表示无限期阻塞。
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream
            .set_read_timeout(timeout)
            .map_err(|err| map_io_error(CONFIGURE, err))
    }

    /// 查询内核当前生效的读超时。
    pub fn read_timeout(&self) -> Result<Option<Duration>> {
        self.stream
            .read_timeout()
            .map_err(|err| map_io_error(CONFIGURE, err))
    }

    /// 获取对端地址。
    pub fn peer_addr(&self) -> Option<TransportSocketAddr> {
        self.peer_addr
    }

    /// 获取本地地址。
    pub fn local_addr(&self) -> Option<TransportSocketAddr> {
        self.local_addr
    }

    /// 根据方向执行半关闭。
    pub fn shutdown(&self, direction: ShutdownDirection) -> Result<()> {
        let how = match direction {
            ShutdownDirection::Read => StdShutdown::Read,
            ShutdownDirection::Write => StdShutdown::Write,
            ShutdownDirection::Both => StdShutdown::Both,
        };
        self.stream
            .shutdown(how)
            .map_err(|err| map_io_error(SHUTDOWN, err))
    }

    /// 将通道拆解为 [`TcpChannelParts`]，供需要直接驱动底层流的上层协议使用。
    pub fn into_parts(self) -> TcpChannelParts {
        TcpChannelParts {
            stream: self.stream,
            local_addr: self.local_addr,
            peer_addr: self.peer_addr,
        }
    }
}

impl TransportConnection for TcpChannel {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        TcpChannel::set_read_timeout(self, timeout)
    }

    fn read_timeout(&self) -> Result<Option<Duration>> {
        TcpChannel::read_timeout(self)
    }

    fn peer_addr(&self) -> Option<TransportSocketAddr> {
        TcpChannel::peer_addr(self)
    }

    fn local_addr(&self) -> Option<TransportSocketAddr> {
        TcpChannel::local_addr(self)
    }

    fn shutdown(&self, direction: ShutdownDirection) -> Result<()> {
        TcpChannel::shutdown(self, direction)
    }
}

impl Read for TcpChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.stream).read(buf)
    }
}

impl Read for &TcpChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.stream).read(buf)
    }
}

impl Write for TcpChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&self.stream).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&self.stream).flush()
    }
}

impl Write for &TcpChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&self.stream).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&self.stream).flush()
    }
}
