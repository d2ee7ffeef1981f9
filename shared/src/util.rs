/// Current UTC timestamp in whole seconds.
///
/// Unix seconds are the unit of every `updated_at` column and of the
/// optimistic-concurrency checks, so this is the single clock helper.
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
