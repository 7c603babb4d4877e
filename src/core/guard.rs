use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type ScopeMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// 依唯一性範圍（公司名稱或全域）序列化 檢查+寫入
#[derive(Debug, Clone, Default)]
pub struct ScopeLocks {
    scopes: Arc<Mutex<ScopeMap>>,
}

/// 持有期間獨佔該範圍；釋放時若沒有其他持有者或等待者就移除該項
#[derive(Debug)]
pub struct ScopeGuard {
    scope: String,
    scopes: Arc<Mutex<ScopeMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut scopes = self.scopes.lock().unwrap_or_else(PoisonError::into_inner);
        // 等待者在取得 map 鎖時已 clone 了 Arc，計數為 1 代表只剩 map 本身
        if scopes
            .get(&self.scope)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            scopes.remove(&self.scope);
        }
    }
}

impl ScopeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, scope: &str) -> ScopeGuard {
        let lock = {
            let mut scopes = self.scopes.lock().unwrap_or_else(PoisonError::into_inner);
            scopes.entry(scope.to_string()).or_default().clone()
        };
        tracing::trace!("Waiting for scope lock: {}", scope);
        let guard = lock.lock_owned().await;

        ScopeGuard {
            scope: scope.to_string(),
            scopes: Arc::clone(&self.scopes),
            guard: Some(guard),
        }
    }

    pub fn scope_count(&self) -> usize {
        self.scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
