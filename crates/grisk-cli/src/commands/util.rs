use anyhow::{anyhow, Result};

/// Size the global rayon pool; `spec` is a thread count or "auto".
#[cfg(feature = "parallel")]
pub fn configure_threads(spec: &str) {
    let count = if spec.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        spec.parse().unwrap_or_else(|_| num_cpus::get())
    };
    if rayon::ThreadPoolBuilder::new().num_threads(count).build_global().is_err() {
        tracing::debug!("global rayon pool already configured");
    }
}

/// Split a `NAME:VALUE` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("header '{raw}' must look like NAME:VALUE"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("header '{raw}' has an empty name"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
