use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Returns a random alphanumeric string of the given length.
pub fn random_string(length: usize) -> String {
    let mut rng = thread_rng();

    (0..length).map(|_| rng.sample(Alphanumeric) as char).collect()
}
