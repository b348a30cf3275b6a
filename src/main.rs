use std::io::{BufRead, Write};

use jsonpath_dom::json::{serialize, SerializeOptions};
use jsonpath_dom::{query, Value};
use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let options = SerializeOptions::default();
    loop {
        let Some(json) = prompt("json: ", &mut lines)? else {
            return Ok(());
        };
        let Some(path) = prompt("path: ", &mut lines)? else {
            return Ok(());
        };

        let doc: Value = match json.parse() {
            Ok(doc) => doc,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match query::get_all(&doc, path.trim()) {
            Ok(values) => {
                for value in values {
                    match serialize(value, &options) {
                        Ok(text) => println!("{text}"),
                        Err(err) => println!("{err}"),
                    }
                }
            }
            Err(err) => println!("{err}"),
        }
    }
}

fn prompt(
    label: &str,
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
) -> std::io::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    lines.next().transpose()
}
