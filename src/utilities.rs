use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};


/// Read text file contents
pub fn read_text_file<P: AsRef<Path>>(name: P) -> Result<String, io::Error> {
    let mut file = File::open(name)?;
    let mut buffer = String::new();
    file.read_to_string(&mut buffer)?;
    Ok(buffer)
}


/// First existing path from the list
pub fn first_existing(paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find(|file| Path::new(file).exists())
        .map(|file| file.to_string())
}


/// Count with noun in proper form, like "1 host" or "3 hosts"
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
