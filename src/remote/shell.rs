// ABOUTME: POSIX shell quoting and the command lines run on remote hosts.
// ABOUTME: Every path is single-quoted before it reaches a shell.

/// Quote `arg` for a POSIX shell.
pub fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}

/// Run `command` as root without prompting for a password.
pub fn privileged(command: &str) -> String {
    format!("sudo -n sh -c {}", quote(command))
}

pub fn make_dir(path: &str) -> String {
    format!("mkdir -p -- {}", quote(path))
}

pub fn extract(archive: &str, dest: &str) -> String {
    format!("tar -xzf {} -C {}", quote(archive), quote(dest))
}

pub fn remove_file(path: &str) -> String {
    format!("rm -- {}", quote(path))
}

/// Move every entry of `nested` (dotfiles included) into `dest`, then drop `nested`.
pub fn flatten(nested: &str, dest: &str) -> String {
    format!(
        "find {nested} -mindepth 1 -maxdepth 1 -exec mv -t {dest} -- {{}} + && rmdir -- {nested}",
        nested = quote(nested),
        dest = quote(dest),
    )
}

pub fn remove_link(path: &str) -> String {
    format!("rm -f -- {}", quote(path))
}

pub fn symlink(target: &str, link: &str) -> String {
    format!("ln -sfn -- {} {}", quote(target), quote(link))
}

/// rename(2) over the destination, replacing a symlink in one step.
pub fn rename(from: &str, to: &str) -> String {
    format!("mv -fT -- {} {}", quote(from), quote(to))
}

pub fn read_link(path: &str) -> String {
    format!("readlink -- {}", quote(path))
}

pub fn list_dir(path: &str) -> String {
    let path = quote(path);
    format!("if [ -d {path} ]; then ls -1A -- {path}; fi")
}

pub fn upload_sink(path: &str) -> String {
    format!("cat > {}", quote(path))
}
