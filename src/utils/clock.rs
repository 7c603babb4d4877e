use chrono::{Local, NaiveDateTime};

/// 目前的本地時間，供呼叫端注入各時間驗證器
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
