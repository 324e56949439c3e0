use once_cell::sync::Lazy;

macro_rules! exit {
    ($code:expr => $($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit($code);
    }};
}

const HELP: &str = "OVERVIEW: Visual Studio symbol demangler

USAGE: unmangle [options] [arguments...]

Demangles mangled symbols.  The arguments are either file names or symbols.
The special name \"-\" stands for stdin.  If no arguments are given, the
symbols are assumed to come from stdin.  The \"--\" argument causes all
arguments after it to be treated as symbols.

OPTIONS:
  -H, --help          Print usage information
  -W, --windows       Match undname output as slavishly as possible
  -N, --nosym         Only output the demangled name, not the symbol
  -D, --debug         Output demangling debugging spew
  -J, --json          JSON output
  -R, --raw           Raw JSON output
  -M, --minimal       Minimal JSON output
  -A, --attributes    Raw output attribute bitfield (u32)
      --nofile        Interpret arguments only as symbols, not as filenames";

const ABBRV: &[&str] = &["-H", "-W", "-N", "-D", "-J", "-R", "-M", "-A"];
const NAMES: &[&str] = &[
    "--help",
    "--windows",
    "--nosym",
    "--debug",
    "--json",
    "--raw",
    "--minimal",
    "--attributes",
    "--nofile",
];

pub static ARGS: Lazy<Cli> = Lazy::new(Cli::parse);

#[derive(Debug, Clone, Default)]
pub struct Cli {
    /// Match undname output rather than the readable preset.
    pub windows: bool,

    /// Print only the demangled name, not the mangled symbol next to it.
    pub nosym: bool,

    /// Never probe the filesystem; every argument is a symbol.
    pub nofile: bool,

    /// Trace every decoding step to stderr.
    pub debug: bool,

    /// Emit a JSON array instead of plain text.
    pub json: bool,

    /// Emit the raw JSON projection.
    pub raw: bool,

    /// Emit the minimal JSON projection.
    pub minimal: bool,

    /// Raw renderer attribute bitfield overriding the presets.
    pub attributes: Option<u32>,

    /// Symbols, file names, `-` for stdin, and the `--` marker.
    pub inputs: Vec<String>,
}

impl Cli {
    pub fn parse() -> Self {
        let mut cli = Cli::default();
        let mut args = std::env::args().skip(1);
        let mut dd = false;

        while let Some(arg) = args.next() {
            if dd {
                cli.inputs.push(arg);
                continue;
            }
            match arg.as_str() {
                "-H" | "--help" => exit!(0 => "{HELP}"),
                "-W" | "--windows" => cli.windows = true,
                "-N" | "--nosym" => cli.nosym = true,
                "-D" | "--debug" => cli.debug = true,
                "-J" | "--json" => cli.json = true,
                "-R" | "--raw" => cli.raw = true,
                "-M" | "--minimal" => cli.minimal = true,
                "--nofile" => cli.nofile = true,
                "-A" | "--attributes" => {
                    let Some(val) = args.next() else {
                        exit!(1 => "Missing value for --attributes.");
                    };
                    let parsed = match val.strip_prefix("0x") {
                        Some(hex) => u32::from_str_radix(hex, 16),
                        None => val.parse(),
                    };
                    match parsed {
                        Ok(bits) => cli.attributes = Some(bits),
                        Err(..) => exit!(1 => "Invalid attribute bitfield '{val}'."),
                    }
                }
                "--" => {
                    dd = true;
                    cli.inputs.push(arg);
                }
                unknown if unknown.starts_with('-') && unknown.len() > 1 => {
                    let mut distance = u32::MAX;
                    let mut best_guess = "";
                    for name in NAMES.iter().chain(ABBRV) {
                        let d = triple_accel::levenshtein_exp(unknown.as_bytes(), name.as_bytes());
                        if d < distance {
                            distance = d;
                            best_guess = name;
                        }
                    }

                    // A guess that's less than 3 `steps` away from a correct arg.
                    if distance < 4 {
                        exit!(1 => "Unknown cmd arg '{unknown}' did you mean '{best_guess}'?")
                    } else {
                        exit!(1 => "Unknown cmd arg '{unknown}' was entered.");
                    }
                }
                _ => cli.inputs.push(arg),
            }
        }

        cli.validate_args();
        cli
    }

    fn validate_args(&mut self) {
        if (self.raw || self.minimal) && !self.json {
            self.json = true;
        }
        if self.raw && self.minimal {
            exit!(1 => "--raw and --minimal are mutually exclusive.");
        }
    }
}
