//! Account commands.

use secrecy::SecretString;

use softbenny_storefront::Storefront;
use softbenny_storefront::storage::KeyValueStore;

/// Create an account and log into it.
///
/// # Errors
///
/// Returns an error if the input is invalid or the email is taken.
#[allow(clippy::print_stdout)]
pub fn register<S: KeyValueStore>(
    store: &mut Storefront<S>,
    name: &str,
    email: &str,
    password: String,
) -> softbenny_storefront::Result<()> {
    let user = store
        .auth_mut()
        .register(name, email, SecretString::from(password))?;
    println!("Welcome, {}! You are logged in as {}", user.name, user.email);
    Ok(())
}

/// Log in.
///
/// # Errors
///
/// Returns an error if the credentials do not match an account.
#[allow(clippy::print_stdout)]
pub fn login<S: KeyValueStore>(
    store: &mut Storefront<S>,
    email: &str,
    password: String,
) -> softbenny_storefront::Result<()> {
    let password = SecretString::from(password);
    let user = store.auth_mut().login(email, &password)?;
    let purchases = store.auth().state().purchases.len();
    println!(
        "Logged in as {} ({purchases} previous purchases)",
        user.email
    );
    Ok(())
}

/// Log out.
///
/// # Errors
///
/// Returns an error if the stored session cannot be removed.
#[allow(clippy::print_stdout)]
pub fn logout<S: KeyValueStore>(store: &mut Storefront<S>) -> softbenny_storefront::Result<()> {
    store.auth_mut().logout()?;
    println!("Logged out");
    Ok(())
}

/// Show the logged-in user.
#[allow(clippy::print_stdout)]
pub fn whoami<S: KeyValueStore>(store: &Storefront<S>) {
    match store.auth().current_user() {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not logged in"),
    }
}
