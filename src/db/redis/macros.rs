/// Read-through caching for an optional Redis cache.
///
/// With `Some(cache)`, returns the cached value when present; otherwise
/// awaits `$block`, queues the result for caching and returns it. With
/// `None`, simply awaits `$block`.
///
/// # Arguments
/// * `$cache`: an `Option<&Cache>`.
/// * `$key`: the `CacheKey` for the value.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: a future yielding `AppResult<T>`, evaluated only on a miss.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache.as_ref(), CacheKey::MovieDetails(id), 3600, async move {
///     fetch_details(id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache {
            Some(cache) => {
                if let Some(hit) = cache.get_from_cache(&$key).await? {
                    Ok(hit)
                } else {
                    let value = $block.await?;
                    cache.set_in_background(&$key, &value, $ttl);
                    Ok(value)
                }
            }
            None => $block.await,
        }
    }};
}
