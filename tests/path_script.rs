// Copyright 2023 RisingWave Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! This file is the runner of the path scripts in `path_script.txt`.

use std::str::FromStr;

use jsonpath_dom::json::{serialize, SerializeOptions};
use jsonpath_dom::{query, Value};
use libtest_mimic::{Arguments, Failed, Trial};

fn main() {
    let args = Arguments::from_args();

    let tests = parse_script(include_str!("path_script.txt"));

    libtest_mimic::run(&args, tests).exit();
}

fn parse_script(script: &'static str) -> Vec<Trial> {
    let mut tests = vec![];
    let mut json = "";
    let mut lines = script
        .lines()
        .enumerate()
        // skip comments
        .filter(|(_, line)| !line.starts_with('#'))
        .peekable();
    while let Some((line_no, line)) = lines.next() {
        if let Some(doc) = line.strip_prefix("json:") {
            json = doc.trim();
            continue;
        }
        let Some(path) = line.strip_prefix("path:") else {
            continue;
        };
        let path = path.trim();
        let mut expected = vec![];
        while let Some((_, line)) = lines.next_if(|(_, line)| !line.trim().is_empty()) {
            expected.push(line.trim());
        }
        tests.push(Trial::test(
            format!("path_script.txt:{}", line_no + 1),
            move || test(json, path, &expected),
        ));
    }
    tests
}

fn test(json: &str, path: &str, expected: &[&str]) -> Result<(), Failed> {
    let doc = Value::from_str(json)?;
    let actual = query::get_all(&doc, path);
    match (actual, expected) {
        (Err(e), [msg]) if msg.starts_with("error: ") => {
            let msg = &msg["error: ".len()..];
            if e.to_string().contains(msg) {
                return Ok(());
            }
            Err(format!("expected error containing {msg:?}, got: {e}").into())
        }
        (Ok(values), expected) => {
            let actual = values
                .into_iter()
                .map(|v| serialize(v, &SerializeOptions::default()))
                .collect::<Result<Vec<_>, _>>()?;
            if actual == expected {
                return Ok(());
            }
            Err(format!("expected: {expected:?}, got: {actual:?}").into())
        }
        (actual, expected) => Err(format!("expected: {expected:?}, got: {actual:?}").into()),
    }
}
