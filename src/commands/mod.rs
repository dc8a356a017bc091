//! Stock command packs.
//!
//! Each pack contributes a [`CommandSet`]; [`default_set`] merges them in
//! order, later packs winning on name collision. Hosts can start from the
//! default set, from a subset, or from their own.

use crate::registry::CommandSet;

pub mod clock;
pub mod dice;
pub mod fs;

/// All stock packs merged: filesystem, dice game, clock.
pub fn default_set() -> CommandSet {
    let mut set = fs::command_set();
    set.extend(dice::command_set());
    set.extend(clock::command_set());
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_carries_every_pack() {
        let set = default_set();
        for name in ["cd", "ls", "echo", "diceGame", "time"] {
            assert!(set.contains_key(name), "missing {name}");
        }
    }
}
