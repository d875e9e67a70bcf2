//! 指数バックオフ + ジッタによる再試行
//!
//! 待ち時間は `遅延 + U[0,1)秒`。遅延は base, 2·base, 4·base, … と倍増する。
//! ジッタは遅延の大きさに関係なく[0,1)秒の一様乱数。

use rand::Rng;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// 再試行ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大試行回数（初回を含む）
    pub max_attempts: u32,
    /// 初回失敗後の待ち時間（ジッタ除く）
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts, base_delay }
    }

    /// 実際に試行する回数。0は1回として扱う
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// ジッタを除いた待ち時間の列（attempts - 1 個）
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        std::iter::successors(Some(self.base_delay), |d| Some(d.saturating_mul(2)))
            .take(self.attempts() as usize - 1)
    }
}

/// 待機の抽象（テストでは記録用に差し替える）
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// 呼び出しスレッドをブロックして待つ
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// [0,1)秒のジッタ
fn jitter<R: Rng>(rng: &mut R) -> Duration {
    Duration::from_nanos(rng.gen_range(0..NANOS_PER_SEC))
}

/// 再試行ループ本体
///
/// 成功すれば即座に返す。最終試行でも失敗した場合は、
/// 最後のエラーをそのまま返す（ラップしない）。
pub fn retry_with<T, E, F, R>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    rng: &mut R,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Display,
    R: Rng,
{
    let max_attempts = policy.attempts();
    let mut delay = policy.base_delay;
    let mut attempt = 1;

    loop {
        match operation() {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "Succeeded after {} attempts", attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                error!(attempts = max_attempts, error = %e, "Failed after {} attempts: {}", max_attempts, e);
                return Err(e);
            }
            Err(e) => {
                let wait = delay.saturating_add(jitter(rng));
                warn!(
                    attempt,
                    error = %e,
                    wait_secs = wait.as_secs_f64(),
                    "Attempt {} failed with error: {}. Retrying in {:.2} seconds...",
                    attempt,
                    e,
                    wait.as_secs_f64()
                );
                sleeper.sleep(wait);
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
        }
    }
}

/// ポリシーと待機方法をまとめた再試行器
///
/// 呼び出しごとに試行回数と遅延はリセットされる。
#[derive(Clone)]
pub struct Retrier {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl Retrier {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, Arc::new(ThreadSleeper))
    }

    pub fn with_sleeper(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn run<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Display,
    {
        retry_with(&self.policy, self.sleeper.as_ref(), &mut rand::thread_rng(), operation)
    }
}

impl std::fmt::Debug for Retrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrier").field("policy", &self.policy).finish()
    }
}

/// スレッドをブロックして再試行する
pub fn retry_with_backoff<T, E, F>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Display,
{
    Retrier::new(*policy).run(operation)
}
