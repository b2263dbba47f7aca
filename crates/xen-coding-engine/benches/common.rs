// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_chain(depth: usize) -> String {
    let mut abbreviation = String::from("grid");
    for level in 0..depth {
        abbreviation.push_str(&format!(">stack#level{level}.panel"));
    }
    abbreviation.push_str(">tb{leaf}");
    abbreviation
}

#[allow(dead_code)]
pub fn generate_siblings(count: usize) -> String {
    let mut abbreviation = String::from("stack>");
    let items: Vec<String> = (0..count)
        .map(|i| format!("btn#b{i}[Width={i} Tag='item {i}']{{Button {i}}}"))
        .collect();
    abbreviation.push_str(&items.join("+"));
    abbreviation
}

#[allow(dead_code)]
pub fn generate_form() -> String {
    "grid>stack*4>tb{Label $$}+txt#field$$[Text={Binding Field$$, Mode=TwoWay}]^^btn.primary{Save}"
        .to_string()
}
