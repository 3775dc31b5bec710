/// Builds a cache key from an endpoint and its query parameters.
///
/// Parameters are sorted by name, so the same request always maps to the
/// same key regardless of argument order:
///
/// ```
/// use hardened_client::cache_key;
///
/// let a = cache_key("/quote", [("to", "USDC"), ("from", "ETH")]);
/// let b = cache_key("/quote", [("from", "ETH"), ("to", "USDC")]);
/// assert_eq!(a, "/quote?from=ETH&to=USDC");
/// assert_eq!(a, b);
/// ```
pub fn cache_key<I, K, V>(endpoint: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut params: Vec<(K, V)> = params.into_iter().collect();
    params.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));

    let mut key = String::from(endpoint);
    for (i, (name, value)) in params.iter().enumerate() {
        key.push(if i == 0 { '?' } else { '&' });
        key.push_str(name.as_ref());
        key.push('=');
        key.push_str(value.as_ref());
    }
    key
}
