//! 變更通知器

use grid_core::ChangeReason;

/// 變更回呼
pub type ChangeCallback = Box<dyn FnMut(&ChangeReason) + Send>;

/// 訂閱句柄，用於取消訂閱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// 變更通知器
///
/// 保存最近一次的變更原因，並同步地按註冊順序通知所有訂閱者。
/// 一次通知會在所有訂閱者處理完畢後才返回，下一次通知才會開始。
pub struct ChangeNotifier {
    reason: ChangeReason,
    subscribers: Vec<(ListenerHandle, ChangeCallback)>,
    next_id: u64,
    emitted: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            reason: ChangeReason::Initial,
            subscribers: Vec::new(),
            next_id: 1,
            emitted: 0,
        }
    }

    /// 註冊回呼
    pub fn subscribe<C>(&mut self, callback: C) -> ListenerHandle
    where
        C: FnMut(&ChangeReason) + Send + 'static,
    {
        let handle = ListenerHandle(self.next_id);
        self.next_id += 1;
        self.subscribers.push((handle, Box::new(callback)));
        handle
    }

    /// 取消訂閱，返回是否確實移除
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(h, _)| *h != handle);
        before != self.subscribers.len()
    }

    /// 替換當前變更原因並通知所有訂閱者
    pub fn notify(&mut self, reason: ChangeReason) {
        self.reason = reason;
        self.emitted += 1;

        tracing::trace!(
            "通知變更 {}，訂閱者 {} 個",
            self.reason.label(),
            self.subscribers.len()
        );

        for (_, callback) in self.subscribers.iter_mut() {
            callback(&self.reason);
        }
    }

    /// 當前變更原因
    pub fn current(&self) -> &ChangeReason {
        &self.reason
    }

    /// 已發出的通知次數
    pub fn emitted_count(&self) -> u64 {
        self.emitted
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// 移除所有訂閱者
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("reason", &self.reason)
            .field("subscribers", &self.subscribers.len())
            .field("emitted", &self.emitted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(&ChangeReason) + Send + 'static) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        (log, move |reason: &ChangeReason| {
            sink.lock().unwrap().push(reason.label().to_string())
        })
    }

    #[test]
    fn test_initial_reason() {
        let notifier = ChangeNotifier::new();
        assert_eq!(notifier.current(), &ChangeReason::Initial);
        assert_eq!(notifier.emitted_count(), 0);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_notify_replaces_reason() {
        let mut notifier = ChangeNotifier::new();
        notifier.notify(ChangeReason::FieldSetChanged);
        notifier.notify(ChangeReason::Inserted {
            index: 0,
            row_id: "a".to_string(),
        });

        assert_eq!(
            notifier.current(),
            &ChangeReason::Inserted {
                index: 0,
                row_id: "a".to_string()
            }
        );
        assert_eq!(notifier.emitted_count(), 2);
    }

    #[test]
    fn test_fan_out_in_registration_order() {
        let mut notifier = ChangeNotifier::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            notifier.subscribe(move |_reason: &ChangeReason| order.lock().unwrap().push(name));
        }

        notifier.notify(ChangeReason::FieldSetChanged);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut notifier = ChangeNotifier::new();
        let (log, callback) = recorder();
        let handle = notifier.subscribe(callback);

        notifier.notify(ChangeReason::FieldSetChanged);
        assert!(notifier.unsubscribe(handle));
        assert!(!notifier.unsubscribe(handle));
        notifier.notify(ChangeReason::FieldSetChanged);

        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_stops_delivery() {
        let mut notifier = ChangeNotifier::new();
        let (log, callback) = recorder();
        notifier.subscribe(callback);

        notifier.clear();
        notifier.notify(ChangeReason::FieldSetChanged);

        assert!(log.lock().unwrap().is_empty());
        // 原因仍會被替換
        assert_eq!(notifier.current(), &ChangeReason::FieldSetChanged);
    }
}
