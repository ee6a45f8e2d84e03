use std::process::Command;

fn git(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .and_then(|out| {
            if out.status.success() {
                String::from_utf8(out.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"]);
    let commit = git(&["rev-parse", "--short", "HEAD"]);
    println!("cargo:rustc-env=SFXPIPE_GIT_BRANCH={}", branch);
    println!("cargo:rustc-env=SFXPIPE_GIT_COMMIT={}", commit);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
