//! Fixed catalog of read-only diagnostic commands.
//!
//! Each variant renders to one literal shell line. The only parameterized
//! command is the package lookup, and its argument is constrained to a
//! single literal word before it reaches the shell.

/// The fixed diagnostic command set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagCommand {
    Release,
    Uname,
    Uptime,
    DiskUsage,
    Memory,
    CpuStats,
    LoggedIn,
    AuthHistory,
    SyslogTail,
    Processes,
    Sockets,
    AptList(Option<String>),
    Services,
    ReplLog,
}

impl DiagCommand {
    /// Builds the package-lookup command. The argument must be a single
    /// plain package word; anything else falls back to the first-10
    /// installed-packages listing, same as no argument at all.
    pub fn apt_list(arg: Option<&str>) -> Self {
        let package = arg
            .and_then(|raw| raw.split_whitespace().next())
            .filter(|word| is_package_word(word))
            .map(|word| word.to_string());
        DiagCommand::AptList(package)
    }

    /// The literal shell line executed remotely. `repl_log_path` is the
    /// configured log-file path used only by `ReplLog`.
    pub fn shell_line(&self, repl_log_path: &str) -> String {
        match self {
            DiagCommand::Release => "cat /etc/*release".to_string(),
            DiagCommand::Uname => "uname -a".to_string(),
            DiagCommand::Uptime => "uptime".to_string(),
            DiagCommand::DiskUsage => "df -h".to_string(),
            DiagCommand::Memory => "free -m".to_string(),
            DiagCommand::CpuStats => "mpstat".to_string(),
            DiagCommand::LoggedIn => "w".to_string(),
            DiagCommand::AuthHistory => "last -n 10".to_string(),
            DiagCommand::SyslogTail => "tail -n 5 /var/log/syslog".to_string(),
            DiagCommand::Processes => "ps".to_string(),
            DiagCommand::Sockets => "ss -tuln".to_string(),
            DiagCommand::AptList(Some(package)) => format!("apt show {package}"),
            DiagCommand::AptList(None) => "apt list --installed | head -n 10".to_string(),
            DiagCommand::Services => {
                "systemctl list-units --type=service --state=running".to_string()
            }
            DiagCommand::ReplLog => format!("cat {repl_log_path} | grep repl | tail -n 15"),
        }
    }
}

fn is_package_word(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '+' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "/var/log/postgresql/postgresql.log";

    #[test]
    fn renders_fixed_command_lines() {
        assert_eq!(DiagCommand::Release.shell_line(LOG), "cat /etc/*release");
        assert_eq!(DiagCommand::Uname.shell_line(LOG), "uname -a");
        assert_eq!(DiagCommand::AuthHistory.shell_line(LOG), "last -n 10");
        assert_eq!(DiagCommand::SyslogTail.shell_line(LOG), "tail -n 5 /var/log/syslog");
        assert_eq!(
            DiagCommand::Services.shell_line(LOG),
            "systemctl list-units --type=service --state=running"
        );
        assert_eq!(
            DiagCommand::ReplLog.shell_line(LOG),
            "cat /var/log/postgresql/postgresql.log | grep repl | tail -n 15"
        );
    }

    #[test]
    fn apt_lookup_uses_the_given_word() {
        assert_eq!(
            DiagCommand::apt_list(Some("nginx")).shell_line(LOG),
            "apt show nginx"
        );
        assert_eq!(
            DiagCommand::apt_list(Some("  libssl-dev  ")).shell_line(LOG),
            "apt show libssl-dev"
        );
    }

    #[test]
    fn apt_lookup_without_argument_lists_first_ten() {
        assert_eq!(
            DiagCommand::apt_list(None).shell_line(LOG),
            "apt list --installed | head -n 10"
        );
        assert_eq!(
            DiagCommand::apt_list(Some("")).shell_line(LOG),
            "apt list --installed | head -n 10"
        );
    }

    #[test]
    fn apt_lookup_refuses_shell_metacharacters() {
        for bad in ["nginx; rm -rf /", "$(id)", "`id`", "a|b", "-flag"] {
            assert_eq!(
                DiagCommand::apt_list(Some(bad)),
                DiagCommand::AptList(None),
                "accepted {bad:?}"
            );
        }
    }
}
