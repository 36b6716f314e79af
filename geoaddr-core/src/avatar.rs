/// Returns an 80px Gravatar URL for the given e-mail address.
pub fn gravatar_url(email: &str) -> String {
    let hash = md5::compute(email.to_lowercase());
    format!("https://www.gravatar.com/avatar/{hash:x}.jpg?s=80&d=wavatar")
}
