use k8s_openapi::api::core::v1::PodTemplateSpec;
use rand::Rng;

pub mod deployment;
pub mod job;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const SUFFIX_LEN: usize = 5;

pub trait TemplateSpecOps {
    /// Get a copy of the pod template, made suitable to run once as a job
    fn get_job_pod_template(&self) -> Option<PodTemplateSpec>;
}

/// Generate a lowercase alphabetic suffix used to make job names unique
///
/// # Arguments
///
/// * `rng` - R
/// * `len` - usize
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
