//! 扫描会话结果通道
//!
//! 扫描源在会话结束时异步交付且仅交付一次结果：完成、失败或取消之一。
//! 发送端持有一次性通道，重复交付返回 [`CaptureError::AlreadyDelivered`]。

use crate::scan::RoomScan;
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};

/// 扫描错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Room scanning requires a LiDAR-capable device.")]
    UnsupportedEnvironment,

    #[error("Capture result was already delivered")]
    AlreadyDelivered,

    #[error("Capture session failed: {0}")]
    Session(String),
}

/// 扫描会话的最终结果
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Completed(RoomScan),
    Failed(CaptureError),
    Cancelled,
}

/// 创建一次性结果通道
pub fn capture_channel() -> (CaptureSender, CaptureReceiver) {
    let (tx, rx) = oneshot::channel();
    (CaptureSender { tx: Some(tx) }, CaptureReceiver { rx: Some(rx) })
}

/// 结果发送端（由扫描源持有）
#[derive(Debug)]
pub struct CaptureSender {
    tx: Option<oneshot::Sender<CaptureOutcome>>,
}

impl CaptureSender {
    /// 交付结果，只有第一次交付生效
    pub fn deliver(&mut self, outcome: CaptureOutcome) -> Result<(), CaptureError> {
        let tx = self.tx.take().ok_or(CaptureError::AlreadyDelivered)?;
        if tx.send(outcome).is_err() {
            tracing::debug!("capture receiver dropped before delivery");
        }
        Ok(())
    }

    pub fn complete(&mut self, room: RoomScan) -> Result<(), CaptureError> {
        self.deliver(CaptureOutcome::Completed(room))
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CaptureError> {
        self.deliver(CaptureOutcome::Failed(CaptureError::Session(message.into())))
    }

    pub fn cancel(&mut self) -> Result<(), CaptureError> {
        self.deliver(CaptureOutcome::Cancelled)
    }

    /// 是否已经交付过
    pub fn is_delivered(&self) -> bool {
        self.tx.is_none()
    }
}

/// 结果接收端
///
/// 发送端未交付就被丢弃时读作 [`CaptureOutcome::Cancelled`]。
#[derive(Debug)]
pub struct CaptureReceiver {
    rx: Option<oneshot::Receiver<CaptureOutcome>>,
}

impl CaptureReceiver {
    /// 等待结果
    pub async fn recv(self) -> CaptureOutcome {
        match self.rx {
            Some(rx) => rx.await.unwrap_or(CaptureOutcome::Cancelled),
            None => CaptureOutcome::Cancelled,
        }
    }

    /// 非阻塞轮询；仍在扫描时返回 `None`，结果只会返回一次
    pub fn try_recv(&mut self) -> Option<CaptureOutcome> {
        let rx = self.rx.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => CaptureOutcome::Cancelled,
        };
        self.rx = None;
        Some(outcome)
    }
}

/// 扫描源（外部传感器会话）
pub trait CaptureSource {
    /// 当前硬件是否具备所需传感器
    fn is_supported(&self) -> bool;

    /// 启动会话，结果通过 `sender` 交付
    fn start(&mut self, sender: CaptureSender) -> Result<(), CaptureError>;
}

/// 检查环境后启动扫描会话
pub fn begin_capture<S: CaptureSource + ?Sized>(
    source: &mut S,
) -> Result<CaptureReceiver, CaptureError> {
    if !source.is_supported() {
        tracing::warn!("capture requested on unsupported hardware");
        return Err(CaptureError::UnsupportedEnvironment);
    }

    let (sender, receiver) = capture_channel();
    source.start(sender)?;
    Ok(receiver)
}

/// 回放已录制扫描结果的扫描源
#[derive(Debug, Clone, Default)]
pub struct RecordedScan {
    room: RoomScan,
}

impl RecordedScan {
    pub fn new(room: RoomScan) -> Self {
        Self { room }
    }
}

impl CaptureSource for RecordedScan {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&mut self, mut sender: CaptureSender) -> Result<(), CaptureError> {
        sender.complete(std::mem::take(&mut self.room))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::scan::Wall;

    struct NoSensor;

    impl CaptureSource for NoSensor {
        fn is_supported(&self) -> bool {
            false
        }

        fn start(&mut self, _sender: CaptureSender) -> Result<(), CaptureError> {
            panic!("session must not start without a sensor");
        }
    }

    #[test]
    fn test_second_delivery_is_rejected() {
        let (mut tx, mut rx) = capture_channel();
        tx.cancel().unwrap();
        assert!(tx.is_delivered());
        assert_eq!(tx.complete(RoomScan::default()), Err(CaptureError::AlreadyDelivered));

        assert_eq!(rx.try_recv(), Some(CaptureOutcome::Cancelled));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_pending_then_failed() {
        let (mut tx, mut rx) = capture_channel();
        assert_eq!(rx.try_recv(), None);

        tx.fail("tracking lost").unwrap();
        assert_eq!(
            rx.try_recv(),
            Some(CaptureOutcome::Failed(CaptureError::Session("tracking lost".into())))
        );
    }

    #[tokio::test]
    async fn test_dropped_sender_reads_as_cancelled() {
        let (tx, rx) = capture_channel();
        drop(tx);
        assert_eq!(rx.recv().await, CaptureOutcome::Cancelled);
    }

    #[test]
    fn test_unsupported_environment_fails_before_start() {
        let err = begin_capture(&mut NoSensor).unwrap_err();
        assert_eq!(err, CaptureError::UnsupportedEnvironment);
        assert_eq!(err.to_string(), "Room scanning requires a LiDAR-capable device.");
    }

    #[tokio::test]
    async fn test_recorded_scan_delivers_room() {
        let room = RoomScan::new(vec![Wall::from_pose(Point3::origin(), 0.0, 2.0, 2.4)]);
        let mut source = RecordedScan::new(room.clone());

        let rx = begin_capture(&mut source).unwrap();
        assert_eq!(rx.recv().await, CaptureOutcome::Completed(room));
    }
}
