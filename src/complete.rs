//! Tab-completion: longest-common-prefix resolution over a candidate set.
//!
//! The resolver is pure; the shell assembles the candidate set (command
//! names, or a command's own argument candidates) and applies the outcome.

/// Outcome of one Tab press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// No candidates; leave the input alone.
    None,
    /// Replace the input, cursor at end-of-text. A committed single match
    /// carries a trailing space; a partial prefix extension does not.
    Replace(String),
    /// The prefix cannot be extended: echo the current line and these raw
    /// candidate labels, leaving the input unchanged.
    List(Vec<String>),
}

/// Resolve one Tab press.
///
/// `candidates` are full replacement lines already filtered to start with
/// `input`; `labels` are the raw (unprefixed) names printed when listing.
/// Narrowing is always attempted before listing, so repeated Tab presses
/// first extend the prefix and only then enumerate.
pub fn resolve(input: &str, candidates: &[String], labels: &[String]) -> Completion {
    match candidates {
        [] => Completion::None,
        [only] => Completion::Replace(format!("{only} ")),
        _ => {
            let prefix = common_prefix(candidates);
            if prefix != input {
                Completion::Replace(prefix)
            } else {
                Completion::List(labels.to_vec())
            }
        }
    }
}

/// Longest common prefix, extended one character at a time while every
/// candidate still starts with it.
fn common_prefix(candidates: &[String]) -> String {
    let first = &candidates[0];
    let mut prefix = String::new();
    for (end, c) in first.char_indices() {
        let next = &first[..end + c.len_utf8()];
        if candidates.iter().all(|cand| cand.starts_with(next)) {
            prefix = next.to_string();
        } else {
            break;
        }
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_candidates_is_noop() {
        assert_eq!(resolve("xy", &[], &[]), Completion::None);
    }

    #[test]
    fn single_candidate_commits_with_trailing_space() {
        let c = strings(&["players"]);
        assert_eq!(resolve("pla", &c, &c), Completion::Replace("players ".into()));

        let h = strings(&["help"]);
        assert_eq!(resolve("he", &h, &h), Completion::Replace("help ".into()));
    }

    #[test]
    fn ambiguous_candidates_extend_to_common_prefix() {
        let c = strings(&["roomInfo", "roomList"]);
        assert_eq!(resolve("ro", &c, &c), Completion::Replace("room".into()));
    }

    #[test]
    fn exhausted_prefix_lists_raw_labels() {
        let c = strings(&["roomInfo", "roomList"]);
        assert_eq!(
            resolve("room", &c, &c),
            Completion::List(strings(&["roomInfo", "roomList"]))
        );
    }

    #[test]
    fn labels_may_differ_from_candidates() {
        // argument completion: candidates carry the command word, labels do not
        let c = strings(&["cd home", "cd root"]);
        let labels = strings(&["home", "root"]);
        assert_eq!(resolve("cd ", &c, &labels), Completion::List(labels.clone()));
        // narrowing still happens on the full candidate strings
        assert_eq!(resolve("cd h", &c[..1], &labels[..1]), Completion::Replace("cd home ".into()));
    }
}
