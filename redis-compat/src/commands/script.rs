//! Scripting and function commands

use crate::cmd::Cmd;
use crate::registry::{self, CommandId};
use redis_compat_core::Arg;

fn with_keys_args<V: Into<Arg> + Clone>(
    id: &'static CommandId,
    head: &str,
    keys: &[&str],
    args: &[V],
) -> Cmd {
    Cmd::new(id)
        .arg(head)
        .arg(keys.len())
        .keys(keys.iter().copied())
        .args(args.iter().cloned())
}

/// Run a Lua script from source
pub fn eval<V: Into<Arg> + Clone>(script: &str, keys: &[&str], args: &[V]) -> Cmd {
    with_keys_args(&registry::EVAL, script, keys, args)
}

/// Read-only `EVAL`
pub fn eval_ro<V: Into<Arg> + Clone>(script: &str, keys: &[&str], args: &[V]) -> Cmd {
    with_keys_args(&registry::EVAL_RO, script, keys, args)
}

/// Run a cached script by SHA1
pub fn evalsha<V: Into<Arg> + Clone>(sha: &str, keys: &[&str], args: &[V]) -> Cmd {
    with_keys_args(&registry::EVALSHA, sha, keys, args)
}

/// Read-only `EVALSHA`
pub fn evalsha_ro<V: Into<Arg> + Clone>(sha: &str, keys: &[&str], args: &[V]) -> Cmd {
    with_keys_args(&registry::EVALSHA_RO, sha, keys, args)
}

/// Call a library function
pub fn fcall<V: Into<Arg> + Clone>(function: &str, keys: &[&str], args: &[V]) -> Cmd {
    with_keys_args(&registry::FCALL, function, keys, args)
}

/// Read-only `FCALL`
pub fn fcall_ro<V: Into<Arg> + Clone>(function: &str, keys: &[&str], args: &[V]) -> Cmd {
    with_keys_args(&registry::FCALL_RO, function, keys, args)
}

/// Delete a function library
pub fn function_delete(library: &str) -> Cmd {
    Cmd::new(&registry::FUNCTION_DELETE).arg(library)
}

/// Delete every function library
pub fn function_flush() -> Cmd {
    Cmd::new(&registry::FUNCTION_FLUSH)
}

/// `FUNCTION LOAD [REPLACE] code`
pub fn function_load(code: &str, replace: bool) -> Cmd {
    Cmd::new(&registry::FUNCTION_LOAD)
        .arg_if(replace, "REPLACE")
        .arg(code)
}

/// Whether each SHA1 is in the script cache
pub fn script_exists(hashes: &[&str]) -> Cmd {
    Cmd::new(&registry::SCRIPT_EXISTS).args(hashes.iter().copied())
}

/// Empty the script cache
pub fn script_flush() -> Cmd {
    Cmd::new(&registry::SCRIPT_FLUSH)
}

/// Kill the running script
pub fn script_kill() -> Cmd {
    Cmd::new(&registry::SCRIPT_KILL)
}

/// Load a script into the script cache
pub fn script_load(script: &str) -> Cmd {
    Cmd::new(&registry::SCRIPT_LOAD).arg(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_numkeys_and_key_positions() {
        let cmd = eval("return 1", &["a", "b"], &["x"]);
        assert_eq!(cmd.to_string(), "EVAL return 1 2 a b x");
        assert_eq!(cmd.key_strings(), vec!["a", "b"]);

        let cmd = evalsha_ro::<&str>("abc", &[], &[]);
        assert_eq!(cmd.to_string(), "EVALSHA_RO abc 0");
        assert_eq!(cmd.slot(), None);
    }

    #[test]
    fn test_function_load() {
        assert_eq!(
            function_load("#!lua name=lib", true).to_string(),
            "FUNCTION LOAD REPLACE #!lua name=lib"
        );
        assert_eq!(script_exists(&["a", "b"]).to_string(), "SCRIPT EXISTS a b");
    }
}
