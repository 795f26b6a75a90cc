use core_auth::generate_secret_key;

fn main() {
    println!("{}", generate_secret_key());
    eprintln!("Add this value to env var SECRET_KEY in your .env file.");
}
