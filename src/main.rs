//! Driver for the Visual Studio symbol demangler.
//!
//! Arguments are symbols or file names; `-` reads stdin and `--` forces the
//! rest to be treated as symbols.  Output is one line per symbol, or a JSON
//! array in one of three projections.

use std::io::Read;
use std::path::Path;

use args::ARGS;
use demangler::{demangle_with_debug, Attributes, TextOutput};
use serde_json::Value;

fn attributes() -> Attributes {
    match ARGS.attributes {
        Some(bits) => Attributes::from_bits_truncate(bits),
        None if ARGS.windows => Attributes::undname(),
        None => Attributes::pretty(),
    }
}

struct Driver {
    attrs: Attributes,
    first: bool,
    success: bool,
}

impl Driver {
    fn new(attrs: Attributes) -> Self {
        Driver {
            attrs,
            first: true,
            success: true,
        }
    }

    fn demangle(&mut self, sym: &str) {
        if ARGS.json && !self.first {
            print!(",");
        }
        self.first = false;

        match demangle_with_debug(sym, ARGS.debug) {
            Ok(tree) => {
                let text = TextOutput::new(self.attrs).convert(&tree);
                if ARGS.json {
                    let mut value = if ARGS.raw {
                        json::raw(&tree)
                    } else if ARGS.minimal {
                        json::minimal(&tree, self.attrs)
                    } else {
                        json::convert(&tree, self.attrs)
                    };
                    if let Value::Object(obj) = &mut value {
                        obj.insert("symbol".into(), sym.into());
                        obj.insert("demangled".into(), text.into());
                    }
                    print!("{value}");
                } else if ARGS.nosym {
                    println!("{text}");
                } else {
                    println!("{sym} {text}");
                }
            }
            Err(err) => {
                println!("! {sym} {err}");
                self.success = false;
            }
        }
    }

    fn demangle_file(&mut self, reader: &mut dyn Read) {
        let mut contents = String::new();
        if let Err(err) = reader.read_to_string(&mut contents) {
            log::warn!("failed to read input: {err}");
            self.success = false;
            return;
        }
        for sym in contents.split_whitespace() {
            self.demangle(sym);
        }
    }
}

fn main() {
    env_logger::init();

    let mut inputs = ARGS.inputs.clone();
    if inputs.is_empty() {
        // No arguments means the symbols come from stdin.
        inputs.push(String::from("-"));
    }

    let mut driver = Driver::new(attributes());
    if ARGS.json {
        print!("[");
    }

    let mut dd = false;
    let mut used_stdin = false;
    for arg in &inputs {
        if !dd && arg == "--" {
            dd = true;
            continue;
        }
        if !dd && !ARGS.nofile && arg == "-" {
            if used_stdin {
                eprintln!("The stdin file \"-\" can only be used once");
                std::process::exit(1);
            }
            used_stdin = true;
            driver.demangle_file(&mut std::io::stdin().lock());
            continue;
        }
        if !dd && !ARGS.nofile && Path::new(arg).exists() {
            match std::fs::File::open(arg) {
                Ok(mut file) => driver.demangle_file(&mut file),
                Err(err) => {
                    log::warn!("failed to open {arg}: {err}");
                    driver.success = false;
                }
            }
            continue;
        }
        driver.demangle(arg);
    }

    if ARGS.json {
        println!("]");
    }

    std::process::exit(if driver.success { 0 } else { 1 });
}
