//! 运行级取消信号
//!
//! `CancelSource` 属于一次运行，`CancelToken` 分发给每个工作任务。
//! 工作任务可以派生出带本地标志的子令牌，超时后只取消自己那一行。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// 取消信号的发送端
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            run: self.tx.subscribe(),
            local: None,
        }
    }

    /// 取消整次运行
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// 取消信号的接收端
#[derive(Debug, Clone)]
pub struct CancelToken {
    run: watch::Receiver<bool>,
    local: Option<Arc<AtomicBool>>,
}

impl CancelToken {
    /// 永不触发的令牌
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self {
            run: rx,
            local: None,
        }
    }

    /// 派生子令牌：继承运行级信号，另带一个只属于自己的标志
    pub fn child(&self) -> Self {
        Self {
            run: self.run.clone(),
            local: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    /// 只取消本令牌（及其克隆），不影响整次运行
    pub fn cancel_local(&self) {
        if let Some(flag) = &self.local {
            flag.store(true, Ordering::SeqCst);
        }
    }

    /// 同步检查，供 CPU 密集的分析代码在检查点调用
    pub fn is_cancelled(&self) -> bool {
        *self.run.borrow()
            || self
                .local
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// 等待运行级取消；发送端已释放时永远挂起
    pub async fn cancelled(&self) {
        let mut rx = self.run.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_child_local_cancel_is_isolated() {
        let source = CancelSource::new();
        let token = source.token();
        let child = token.child();
        let sibling = token.child();

        child.cancel_local();
        assert!(child.is_cancelled());
        assert!(!sibling.is_cancelled());
        assert!(!token.is_cancelled());

        source.cancel();
        assert!(sibling.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiters() {
        let source = CancelSource::new();
        let token = source.token();
        let waiter = tokio::spawn(async move { token.cancelled().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        source.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("等待取消超时")
            .unwrap();
    }

    #[tokio::test]
    async fn test_never_token_stays_pending() {
        let token = CancelToken::never();
        assert!(!token.is_cancelled());
        let res = tokio::time::timeout(Duration::from_millis(20), token.cancelled()).await;
        assert!(res.is_err());
    }
}
