/// Read-through caching around an async computation.
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues the
/// result for a background write with `$ttl` seconds and returns it. A failing
/// cache read is logged and treated as a miss.
///
/// # Example
/// ```rust,ignore
/// let results: Vec<ContentItem> = cached!(self.cache, key, self.search_ttl, async move {
///     self.fetch_page(&path, &params).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed, falling back to source");
                None
            }
        };

        match hit {
            Some(value) => Ok(value),
            None => match $block.await {
                Ok(value) => {
                    $cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }};
}
