//! 再試行モジュール
//!
//! スプレッドシート呼び出しなど、一時的に失敗しうる外部呼び出しを
//! 指数バックオフで再試行する。
//!
//! - [`retry_with_backoff`]: 関数として使う
//! - [`Retrying`]: シートクライアントを包んで全呼び出しを再試行する

mod backoff;
mod sink;

pub use backoff::{
    retry_with, retry_with_backoff, Retrier, RetryPolicy, Sleeper, ThreadSleeper,
    DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS,
};
pub use sink::Retrying;

#[cfg(test)]
pub(crate) use backoff::tests::RecordingSleeper;
