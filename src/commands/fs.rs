//! In-memory filesystem emulation commands.
//!
//! Contributes `cd`, `ls`, `pwd`, `mkdir`, `touch`, `cat` and `echo` (with
//! `>` / `>>` redirects) over a tree that lives for the shell's lifetime.
//! The state is an `Rc<RefCell<..>>` cloned into each command closure.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::command::CommandSpec;
use crate::registry::CommandSet;
use crate::shell::Io;
use crate::style::ColorCode;

#[derive(Debug)]
enum Node {
    Dir(BTreeMap<String, Node>),
    File(String),
}

impl Node {
    fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }
}

#[derive(Debug)]
struct Fs {
    root: Node,
    cwd: String,
}

impl Fs {
    fn new() -> Self {
        let mut home = BTreeMap::new();
        home.insert(
            "README".to_string(),
            Node::File("A terminal emulator, now written in Rust!".to_string()),
        );
        let mut top = BTreeMap::new();
        top.insert("home".to_string(), Node::Dir(home));
        top.insert("root".to_string(), Node::Dir(BTreeMap::new()));
        Self {
            root: Node::Dir(top),
            cwd: "/".to_string(),
        }
    }

    /// Absolute normalized path for `target` relative to the working dir.
    fn resolve(&self, target: &str) -> String {
        let joined = if target.starts_with('/') {
            target.to_string()
        } else {
            format!("{}/{}", self.cwd, target)
        };
        let mut parts: Vec<&str> = Vec::new();
        for seg in joined.split('/') {
            match seg {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                other => parts.push(other),
            }
        }
        format!("/{}", parts.join("/"))
    }

    fn node(&self, path: &str) -> Option<&Node> {
        let mut cur = &self.root;
        for seg in path.split('/').filter(|s| !s.is_empty()) {
            match cur {
                Node::Dir(entries) => cur = entries.get(seg)?,
                Node::File(_) => return None,
            }
        }
        Some(cur)
    }

    fn node_mut(&mut self, path: &str) -> Option<&mut Node> {
        let mut cur = &mut self.root;
        for seg in path.split('/').filter(|s| !s.is_empty()) {
            match cur {
                Node::Dir(entries) => cur = entries.get_mut(seg)?,
                Node::File(_) => return None,
            }
        }
        Some(cur)
    }

    fn exists(&self, path: &str) -> bool {
        self.node(path).is_some()
    }

    fn is_dir(&self, path: &str) -> bool {
        self.node(path).is_some_and(Node::is_dir)
    }

    /// Sorted entry names of a directory.
    fn entries(&self, path: &str) -> Option<Vec<String>> {
        match self.node(path)? {
            Node::Dir(entries) => Some(entries.keys().cloned().collect()),
            Node::File(_) => None,
        }
    }

    fn parent_of(path: &str) -> String {
        match path.rfind('/') {
            Some(0) | None => "/".to_string(),
            Some(at) => path[..at].to_string(),
        }
    }

    fn leaf_of(path: &str) -> &str {
        path.rsplit('/').next().unwrap_or(path)
    }

    /// Insert `node` at `path`; the parent must already exist and be a dir.
    fn insert(&mut self, path: &str, node: Node) -> bool {
        let parent = Self::parent_of(path);
        let leaf = Self::leaf_of(path).to_string();
        match self.node_mut(&parent) {
            Some(Node::Dir(entries)) => {
                entries.insert(leaf, node);
                true
            }
            _ => false,
        }
    }
}

/// Create the file at `path` if missing. Reports the same errors `touch`
/// does; `echo` reuses it for redirect targets.
fn touch_at(fs: &mut Fs, path: &str, io: &mut Io<'_>) -> bool {
    if fs.exists(path) {
        io.append_error(&format!("file {path} already exists"));
        return false;
    }
    let parent = Fs::parent_of(path);
    if !fs.exists(&parent) {
        io.append_error(&format!("parent directory {parent} doesn't exist"));
        return false;
    }
    fs.insert(path, Node::File(String::new()))
}

/// The filesystem command pack around a fresh in-memory tree.
pub fn command_set() -> CommandSet {
    let fs = Rc::new(RefCell::new(Fs::new()));
    let mut set = CommandSet::new();

    let state = fs.clone();
    let complete_state = fs.clone();
    set.insert(
        "cd".to_string(),
        CommandSpec::simple(
            "enter a directory using its relative path. usage: cd [relpath]",
            ColorCode::Blue,
            move |args, io| {
                let Some(target) = args.first().filter(|t| !t.is_empty()) else {
                    return Ok(());
                };
                let mut fs = state.borrow_mut();
                let path = fs.resolve(target);
                if !fs.exists(&path) {
                    io.append_error(&format!("directory {path} doesn't exist"));
                } else if !fs.is_dir(&path) {
                    io.append_error(&format!("{path} is not a directory"));
                } else {
                    fs.cwd = path;
                }
                Ok(())
            },
        )
        .with_complete(move |_args| {
            let fs = complete_state.borrow();
            let cwd = fs.cwd.clone();
            fs.entries(&cwd)
                .unwrap_or_default()
                .into_iter()
                .filter(|name| fs.is_dir(&fs.resolve(name)))
                .collect()
        }),
    );

    let state = fs.clone();
    set.insert(
        "ls".to_string(),
        CommandSpec::simple(
            "lists files/folders in the current directory",
            ColorCode::Blue,
            move |args, io| {
                let fs = state.borrow();
                let target = match args.first().filter(|t| !t.is_empty()) {
                    Some(t) => fs.resolve(t),
                    None => fs.cwd.clone(),
                };
                if !fs.exists(&target) {
                    io.append_error(&format!("directory {target} does not exist"));
                } else if !fs.is_dir(&target) {
                    io.append_error(&format!("{target} is not a directory"));
                } else {
                    let names = fs.entries(&target).unwrap_or_default();
                    if !names.is_empty() {
                        io.append_history(names.join(" "));
                    }
                }
                Ok(())
            },
        ),
    );

    let state = fs.clone();
    set.insert(
        "pwd".to_string(),
        CommandSpec::simple(
            "prints the path of the current working directory",
            ColorCode::Blue,
            move |_args, io| {
                io.append_history(state.borrow().cwd.clone());
                Ok(())
            },
        ),
    );

    let state = fs.clone();
    set.insert(
        "mkdir".to_string(),
        CommandSpec::simple(
            "create a folder. usage: mkdir [folder name]",
            ColorCode::Blue,
            move |args, io| {
                let Some(target) = args.first().filter(|t| !t.is_empty()) else {
                    io.append_error("directory name cannot be empty");
                    return Ok(());
                };
                let mut fs = state.borrow_mut();
                let path = fs.resolve(target);
                let parent = Fs::parent_of(&path);
                if fs.exists(&path) {
                    io.append_error(&format!("directory {path} already exists"));
                } else if !fs.exists(&parent) {
                    io.append_error(&format!("parent directory {parent} doesn't exist"));
                } else {
                    fs.insert(&path, Node::Dir(BTreeMap::new()));
                }
                Ok(())
            },
        ),
    );

    let state = fs.clone();
    set.insert(
        "touch".to_string(),
        CommandSpec::simple(
            "create an empty file. usage: touch [file name]",
            ColorCode::Blue,
            move |args, io| {
                let Some(target) = args.first().filter(|t| !t.is_empty()) else {
                    return Ok(());
                };
                let mut fs = state.borrow_mut();
                let path = fs.resolve(target);
                touch_at(&mut fs, &path, io);
                Ok(())
            },
        ),
    );

    let state = fs.clone();
    let complete_state = fs.clone();
    set.insert(
        "cat".to_string(),
        CommandSpec::simple(
            "prints the contents of a file. usage: cat [file path]",
            ColorCode::Blue,
            move |args, io| {
                let Some(target) = args.first().filter(|t| !t.is_empty()) else {
                    return Ok(());
                };
                let fs = state.borrow();
                let path = fs.resolve(target);
                match fs.node(&path) {
                    None => io.append_error(&format!("file {path} doesn't exist")),
                    Some(Node::Dir(_)) => io.append_error(&format!("{path} is a directory")),
                    Some(Node::File(content)) => io.append_history(content.clone()),
                }
                Ok(())
            },
        )
        .with_complete(move |_args| {
            let fs = complete_state.borrow();
            let cwd = fs.cwd.clone();
            fs.entries(&cwd)
                .unwrap_or_default()
                .into_iter()
                .filter(|name| !fs.is_dir(&fs.resolve(name)))
                .collect()
        }),
    );

    let state = fs.clone();
    set.insert(
        "echo".to_string(),
        CommandSpec::simple(
            "echos an input to the console. redirect to files with > and >>. usage: echo [message]",
            ColorCode::Blue,
            move |args, io| {
                let overwrite = args.iter().position(|a| a == ">");
                let append = args.iter().position(|a| a == ">>");
                let (at, keep_old) = match (overwrite, append) {
                    (None, None) => {
                        io.append_history(args.join(" "));
                        return Ok(());
                    }
                    (Some(_), Some(_)) => {
                        io.append_error("bad use of redirects");
                        return Ok(());
                    }
                    (Some(at), None) => (at, false),
                    (None, Some(at)) => (at, true),
                };
                let Some(target) = args.get(at + 1).filter(|t| !t.is_empty()) else {
                    io.append_error("filename cannot be empty");
                    return Ok(());
                };

                let mut fs = state.borrow_mut();
                let path = fs.resolve(target);
                if !fs.exists(&path) && !touch_at(&mut fs, &path, io) {
                    return Ok(());
                }
                if fs.is_dir(&path) {
                    io.append_error(&format!("{path} is a directory"));
                    return Ok(());
                }
                let message = args[..at].join(" ");
                if let Some(Node::File(content)) = fs.node_mut(&path) {
                    if keep_old {
                        content.push_str(&message);
                    } else {
                        *content = message;
                    }
                }
                Ok(())
            },
        ),
    );

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{Key, Shell};
    use crate::style::strip_codes;

    fn shell() -> Shell {
        Shell::new(command_set())
    }

    fn submit(shell: &mut Shell, line: &str) {
        for c in line.chars() {
            shell.handle_key(Key::Char(c));
        }
        shell.handle_key(Key::Enter);
    }

    fn last(shell: &Shell) -> String {
        strip_codes(shell.transcript().last().expect("transcript line"))
    }

    #[test]
    fn resolve_normalizes_dots_and_absolutes() {
        let fs = Fs::new();
        assert_eq!(fs.resolve("home"), "/home");
        assert_eq!(fs.resolve("/root"), "/root");
        assert_eq!(fs.resolve("home/../root"), "/root");
        assert_eq!(fs.resolve("./home/."), "/home");
        assert_eq!(fs.resolve("../.."), "/");
    }

    #[test]
    fn ls_and_pwd_on_fresh_tree() {
        let mut sh = shell();
        submit(&mut sh, "pwd");
        assert_eq!(last(&sh), "/");
        submit(&mut sh, "ls");
        assert_eq!(last(&sh), "home root");
    }

    #[test]
    fn cd_validates_target() {
        let mut sh = shell();
        submit(&mut sh, "cd nowhere");
        assert_eq!(last(&sh), "err directory /nowhere doesn't exist");
        submit(&mut sh, "cd home/README");
        assert_eq!(last(&sh), "err /home/README is not a directory");
        submit(&mut sh, "cd home");
        submit(&mut sh, "pwd");
        assert_eq!(last(&sh), "/home");
        submit(&mut sh, "cd ..");
        submit(&mut sh, "pwd");
        assert_eq!(last(&sh), "/");
    }

    #[test]
    fn mkdir_then_cd_and_duplicate_errors() {
        let mut sh = shell();
        submit(&mut sh, "mkdir lab");
        submit(&mut sh, "mkdir lab");
        assert_eq!(last(&sh), "err directory /lab already exists");
        submit(&mut sh, "mkdir");
        assert_eq!(last(&sh), "err directory name cannot be empty");
        submit(&mut sh, "mkdir ghost/sub");
        assert_eq!(last(&sh), "err parent directory /ghost doesn't exist");
        submit(&mut sh, "cd lab");
        submit(&mut sh, "pwd");
        assert_eq!(last(&sh), "/lab");
    }

    #[test]
    fn cat_reads_files_and_rejects_dirs() {
        let mut sh = shell();
        submit(&mut sh, "cat home/README");
        assert_eq!(last(&sh), "A terminal emulator, now written in Rust!");
        submit(&mut sh, "cat home");
        assert_eq!(last(&sh), "err /home is a directory");
        submit(&mut sh, "cat missing");
        assert_eq!(last(&sh), "err file /missing doesn't exist");
    }

    #[test]
    fn touch_creates_once() {
        let mut sh = shell();
        submit(&mut sh, "touch notes");
        submit(&mut sh, "cat notes");
        assert_eq!(last(&sh), "");
        submit(&mut sh, "touch notes");
        assert_eq!(last(&sh), "err file /notes already exists");
    }

    #[test]
    fn echo_plain_and_redirects() {
        let mut sh = shell();
        submit(&mut sh, "echo hello world");
        assert_eq!(last(&sh), "hello world");

        submit(&mut sh, "echo one > notes");
        submit(&mut sh, "cat notes");
        assert_eq!(last(&sh), "one");

        submit(&mut sh, "echo two >> notes");
        submit(&mut sh, "cat notes");
        assert_eq!(last(&sh), "onetwo");

        submit(&mut sh, "echo three > notes");
        submit(&mut sh, "cat notes");
        assert_eq!(last(&sh), "three");

        submit(&mut sh, "echo x > y >> z");
        assert_eq!(last(&sh), "err bad use of redirects");
        submit(&mut sh, "echo x >");
        assert_eq!(last(&sh), "err filename cannot be empty");
        submit(&mut sh, "echo x > home");
        assert_eq!(last(&sh), "err /home is a directory");
    }

    #[test]
    fn cd_completion_offers_directories_only() {
        let mut sh = shell();
        submit(&mut sh, "touch zfile");
        for c in "cd ".chars() {
            sh.handle_key(Key::Char(c));
        }
        sh.handle_key(Key::Tab);
        // two dirs share no prefix extension: listed, file excluded
        assert_eq!(last(&sh), "home root");
        assert_eq!(sh.input(), "cd ");
    }

    #[test]
    fn cat_completion_offers_files_only() {
        let mut sh = shell();
        submit(&mut sh, "touch zfile");
        for c in "cat z".chars() {
            sh.handle_key(Key::Char(c));
        }
        sh.handle_key(Key::Tab);
        assert_eq!(sh.input(), "cat zfile ");
    }
}
