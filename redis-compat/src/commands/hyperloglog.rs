//! HyperLogLog commands

use crate::cmd::Cmd;
use crate::registry;
use redis_compat_core::Arg;

/// Add elements to a HyperLogLog
pub fn pfadd<V: Into<Arg> + Clone>(key: &str, elements: &[V]) -> Cmd {
    Cmd::new(&registry::PFADD)
        .key(key)
        .args(elements.iter().cloned())
}

/// Approximate cardinality of the union of the given HyperLogLogs
pub fn pfcount(keys: &[&str]) -> Cmd {
    Cmd::new(&registry::PFCOUNT).keys(keys.iter().copied())
}

/// Merge HyperLogLogs into `destination`
pub fn pfmerge(destination: &str, sources: &[&str]) -> Cmd {
    Cmd::new(&registry::PFMERGE)
        .key(destination)
        .keys(sources.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pfmerge_keys() {
        let cmd = pfmerge("dst", &["a", "b"]);
        assert_eq!(cmd.to_string(), "PFMERGE dst a b");
        assert_eq!(cmd.key_count(), 3);
        assert_eq!(pfadd("h", &["x", "y"]).to_string(), "PFADD h x y");
    }
}
