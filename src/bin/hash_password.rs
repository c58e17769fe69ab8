//! Prints an argon2 PHC hash for a `STAFF_ACCOUNTS` entry.
//!
//! `hash_password <username> <role> <password>`

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(username), Some(role), Some(password)) = (args.next(), args.next(), args.next())
    else {
        anyhow::bail!("usage: hash_password <username> <role> <password>");
    };
    if username.contains([':', ';']) || role.contains([':', ';']) {
        anyhow::bail!("username and role must not contain ':' or ';'");
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    println!("{username}:{role}:{password_hash}");
    Ok(())
}
