use std::env;
use std::io;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod output;

/// Generate a deterministic password, or a random string.
///
/// By default a password is derived from the input, salt, length and level; the same values
/// always give the same password. With --gen-random, a random alphanumeric string is printed
/// instead.
#[derive(Parser)]
#[command(name = "passgen", version)]
struct Args {
    /// Input string (required when deriving a password).
    #[arg(short, long, conflicts_with = "gen_random")]
    input: Option<String>,
    /// Salt string. Falls back to $PASSGEN_SALT, then to no salt.
    #[arg(short, long, conflicts_with = "gen_random")]
    salt: Option<String>,
    /// Generate a random salt for the password (overrides --salt and $PASSGEN_SALT).
    #[arg(long, conflicts_with = "gen_random")]
    random_salt: bool,
    /// Print a random string and exit. Only --length may be combined with this.
    #[arg(long)]
    gen_random: bool,
    /// Password or string length (1-4096). For --gen-random, 0 or less means 32.
    #[arg(short, long, default_value_t = 64, allow_negative_numbers = true)]
    length: i64,
    /// Security level: low, medium or strong.
    #[arg(short = 'L', long, default_value = "medium", conflicts_with = "gen_random")]
    level: String,
}

static SALT_ENV_VAR: &str = "PASSGEN_SALT";
static LOG_ENV_VAR: &str = "PASSGEN_LOG";

fn run() -> Result<(), ProgError> {
    let args = Args::parse();

    if args.gen_random {
        // Negative lengths mean "use the default", same as zero.
        let length = usize::try_from(args.length).unwrap_or(0);
        let random = passgen::generate_random_string(length)?;
        output::print_random_string(io::stdout().lock(), &random)?;
        return Ok(());
    }

    let (password, salt) = derive_from_args(args)?;
    output::print_password(io::stdout().lock(), &password, &salt)?;
    Ok(())
}

fn derive_from_args(args: Args) -> Result<(passgen::Secret, Salt), ProgError> {
    // A negative length is just as invalid as zero; leave the reporting order to the library.
    let length = usize::try_from(args.length).unwrap_or(0);
    let input = args.input.unwrap_or_default();
    let salt = resolve_salt(args.salt, args.random_salt)?;
    let password = passgen::derive_password(&input, salt.as_str(), length, &args.level)?;
    Ok((password, salt))
}

fn main() {
    init_logging();
    match run() {
        Ok(()) => (),
        Err(ProgError::Other(err)) => {
            eprintln!("Error: {err:?}");
            process::exit(1);
        }
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    // Logs go to stderr; stdout only carries results.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Where the salt for a derivation came from.
enum Salt {
    /// Freshly minted; the user has to be shown it, or the password can't be recovered.
    Generated(String),
    Given(String),
}

impl Salt {
    fn as_str(&self) -> &str {
        match self {
            Salt::Generated(s) | Salt::Given(s) => s,
        }
    }
}

fn resolve_salt(salt: Option<String>, random_salt: bool) -> Result<Salt, ProgError> {
    if random_salt {
        let salt = passgen::generate_random_string(passgen::DEFAULT_SALT_LENGTH)?;
        tracing::debug!("generated a random salt");
        return Ok(Salt::Generated(salt));
    }
    let salt = match salt.filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => match env::var(SALT_ENV_VAR) {
            Ok(s) => s,
            Err(env::VarError::NotPresent) => String::new(),
            Err(env::VarError::NotUnicode(_)) => return Err(ProgError::SaltNotUnicode),
        },
    };
    Ok(Salt::Given(salt))
}

#[derive(Debug, thiserror::Error)]
enum ProgError {
    #[error("$PASSGEN_SALT is not valid UTF-8")]
    SaltNotUnicode,
    #[error("{0}")]
    Passgen(passgen::PassgenError),
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for ProgError {
    fn from(err: anyhow::Error) -> ProgError {
        ProgError::Other(err)
    }
}

impl From<passgen::PassgenError> for ProgError {
    fn from(err: passgen::PassgenError) -> ProgError {
        ProgError::Passgen(err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard};

    use clap::CommandFactory;

    use super::*;

    /// Serializes tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn given_salt(salt: Salt) -> String {
        match salt {
            Salt::Given(salt) => salt,
            Salt::Generated(_) => panic!("expected a given salt"),
        }
    }

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["passgen", "-i", "myinput"]).unwrap();
        assert_eq!(args.input.as_deref(), Some("myinput"));
        assert_eq!(args.length, 64);
        assert_eq!(args.level, "medium");
        assert!(!args.gen_random);
        assert!(!args.random_salt);
    }

    #[test]
    fn short_flags() {
        let args =
            Args::try_parse_from(["passgen", "-i", "x", "-s", "y", "-l", "20", "-L", "strong"])
                .unwrap();
        assert_eq!(args.salt.as_deref(), Some("y"));
        assert_eq!(args.length, 20);
        assert_eq!(args.level, "strong");
    }

    #[test]
    fn gen_random_only_takes_length() {
        assert!(Args::try_parse_from(["passgen", "--gen-random", "-l", "-1"]).is_ok());
        assert!(Args::try_parse_from(["passgen", "--gen-random", "-l", "16"]).is_ok());
        for conflicting in [
            ["--gen-random", "-i", "x"],
            ["--gen-random", "-s", "y"],
            ["--gen-random", "-L", "low"],
        ] {
            let argv = std::iter::once("passgen").chain(conflicting);
            assert!(Args::try_parse_from(argv).is_err(), "{conflicting:?}");
        }
        assert!(Args::try_parse_from(["passgen", "--gen-random", "--random-salt"]).is_err());
    }

    #[test]
    fn random_salt_is_generated() {
        match resolve_salt(Some("ignored".to_owned()), true).unwrap() {
            Salt::Generated(salt) => assert_eq!(salt.len(), passgen::DEFAULT_SALT_LENGTH),
            Salt::Given(_) => panic!("expected a generated salt"),
        }
    }

    #[test]
    fn explicit_salt_is_used() {
        let _env = lock_env();
        env::set_var(SALT_ENV_VAR, "fromenv");
        let salt = resolve_salt(Some("mysalt".to_owned()), false);
        env::remove_var(SALT_ENV_VAR);
        assert_eq!(given_salt(salt.unwrap()), "mysalt");
    }

    #[test]
    fn salt_falls_back_to_environment() {
        let _env = lock_env();
        env::set_var(SALT_ENV_VAR, "fromenv");
        let missing = resolve_salt(None, false);
        let empty = resolve_salt(Some(String::new()), false);
        env::remove_var(SALT_ENV_VAR);
        assert_eq!(given_salt(missing.unwrap()), "fromenv");
        assert_eq!(given_salt(empty.unwrap()), "fromenv");
    }

    #[test]
    fn salt_defaults_to_empty() {
        let _env = lock_env();
        env::remove_var(SALT_ENV_VAR);
        assert_eq!(given_salt(resolve_salt(None, false).unwrap()), "");
        assert_eq!(given_salt(resolve_salt(Some(String::new()), false).unwrap()), "");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_environment_salt_is_an_error() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let _env = lock_env();
        env::set_var(SALT_ENV_VAR, OsString::from_vec(vec![0xff, 0xfe]));
        let salt = resolve_salt(None, false);
        env::remove_var(SALT_ENV_VAR);
        assert!(matches!(salt, Err(ProgError::SaltNotUnicode)));
    }

    #[test]
    fn missing_input_is_reported_before_bad_length() {
        let _env = lock_env();
        env::remove_var(SALT_ENV_VAR);
        for length in ["-1", "0", "5000"] {
            let args = Args::try_parse_from(["passgen", "-l", length]).unwrap();
            match derive_from_args(args) {
                Err(ProgError::Passgen(passgen::PassgenError::EmptyInput)) => (),
                other => panic!("length {length}: expected EmptyInput, got {:?}", other.err()),
            }
        }
    }

    #[test]
    fn negative_length_with_input_is_invalid() {
        let _env = lock_env();
        env::remove_var(SALT_ENV_VAR);
        let args = Args::try_parse_from(["passgen", "-i", "x", "-l", "-1"]).unwrap();
        assert!(matches!(
            derive_from_args(args),
            Err(ProgError::Passgen(passgen::PassgenError::InvalidLength))
        ));
    }

    #[test]
    fn derives_known_password_from_args() {
        let _env = lock_env();
        env::remove_var(SALT_ENV_VAR);
        let argv = ["passgen", "-i", "myinput", "-s", "mysalt", "-l", "20", "-L", "strong"];
        let (password, salt) = derive_from_args(Args::try_parse_from(argv).unwrap()).unwrap();
        assert_eq!(password.as_str(), "cm!BShcIo2=?wx(70pQq");
        assert_eq!(given_salt(salt), "mysalt");
    }
}
