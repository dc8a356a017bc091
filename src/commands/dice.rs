//! Dice game: a spawning command emulating a small game-lobby client.
//!
//! `diceGame` enters a child context with room management commands. The
//! server side is emulated in-process; room state lives in the opaque
//! context returned by [`Process::run`] and is shared with the command
//! closures through `Rc<RefCell<..>>`.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::command::{CommandSpec, Process};
use crate::registry::CommandSet;
use crate::shell::Io;
use crate::style::{self, ColorCode};

/// Tag prefixed to every game message, painted like the error tag.
fn server_line(msg: &str) -> String {
    format!("{} {msg}", style::paint_bold(ColorCode::Red, "[server]"))
}

#[derive(Debug, Clone)]
struct Room {
    public: bool,
    password: String,
    max_players: usize,
    players: Vec<String>,
}

struct DiceClient {
    address: String,
    port: String,
    rooms: BTreeMap<String, Room>,
    current_room: Option<String>,
    rng: SmallRng,
}

impl DiceClient {
    fn new(address: String, port: String) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let mut rooms = BTreeMap::new();
        rooms.insert(
            "lobby".to_string(),
            Room {
                public: true,
                password: String::new(),
                max_players: 8,
                players: vec!["alice".to_string(), "bob".to_string()],
            },
        );
        Self {
            address,
            port,
            rooms,
            current_room: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Drop out of the current room, if any. Returns the room left.
    fn leave_room(&mut self) -> Option<String> {
        let name = self.current_room.take()?;
        if let Some(room) = self.rooms.get_mut(&name) {
            room.players.retain(|p| p != "you");
        }
        Some(name)
    }

    fn join_room(&mut self, name: &str) {
        self.leave_room();
        if let Some(room) = self.rooms.get_mut(name) {
            room.players.push("you".to_string());
        }
        self.current_room = Some(name.to_string());
    }
}

type Client = Rc<RefCell<DiceClient>>;

/// Finish `createRoom` once name, visibility, password and player limit
/// have all been collected.
fn finish_create_room(
    client: &Client,
    name: String,
    public: bool,
    password: String,
    max_players: usize,
    io: &mut Io<'_>,
) {
    client.borrow_mut().rooms.insert(
        name.clone(),
        Room {
            public,
            password,
            max_players,
            players: Vec::new(),
        },
    );
    client.borrow_mut().join_room(&name);
    io.append_history(server_line(&format!("room {name} created")));
}

/// Third and fourth questions of the `createRoom` chain: the player limit,
/// asked after visibility (and password, for private rooms) is settled.
fn prompt_max_players(client: Client, name: String, public: bool, password: String, io: &mut Io<'_>) {
    io.prompt_text(
        "enter max players...",
        Box::new(move |reply, io| {
            let max_players = reply.trim().parse::<usize>().unwrap_or(1).max(1);
            finish_create_room(&client, name, public, password, max_players, io);
        }),
    );
}

pub struct DiceGame;

impl Process for DiceGame {
    fn spawn_name(&self) -> &str {
        "diceGame"
    }

    fn run(&self, args: &[String], io: &mut Io<'_>) -> Box<dyn Any> {
        let address = args.first().cloned().unwrap_or_else(|| "localhost".to_string());
        let port = args.get(1).cloned().unwrap_or_else(|| "3000".to_string());
        info!("dice game connecting to {address}:{port}");
        io.append_history(server_line("diceGame started"));
        let client: Client = Rc::new(RefCell::new(DiceClient::new(address, port)));
        Box::new(client)
    }

    fn commands(&self, ctx: &dyn Any, _io: &mut Io<'_>) -> CommandSet {
        let Some(client) = ctx.downcast_ref::<Client>() else {
            warn!("dice game context has the wrong type; no commands registered");
            return CommandSet::new();
        };
        let mut set = CommandSet::new();

        let state = client.clone();
        set.insert(
            "roomList".to_string(),
            CommandSpec::simple("lists the public rooms", ColorCode::Yellow, move |_a, io| {
                let state = state.borrow();
                let names: Vec<&str> = state
                    .rooms
                    .iter()
                    .filter(|(_, room)| room.public)
                    .map(|(name, _)| name.as_str())
                    .collect();
                io.append_history(server_line(&format!("rooms: {}", names.join(", "))));
                Ok(())
            }),
        );

        let state = client.clone();
        set.insert(
            "roomInfo".to_string(),
            CommandSpec::simple(
                "prints info about the current room",
                ColorCode::Yellow,
                move |_a, io| {
                    let state = state.borrow();
                    let Some(name) = &state.current_room else {
                        io.append_history(server_line("you are not in a room"));
                        return Ok(());
                    };
                    let room = &state.rooms[name];
                    let visibility = if room.public { "public" } else { "private" };
                    io.append_history(server_line(&format!(
                        "{name}: {visibility}, {}/{} players",
                        room.players.len(),
                        room.max_players
                    )));
                    Ok(())
                },
            ),
        );

        let state = client.clone();
        set.insert(
            "players".to_string(),
            CommandSpec::simple(
                "lists the players in the current room",
                ColorCode::Yellow,
                move |_a, io| {
                    let state = state.borrow();
                    let Some(name) = &state.current_room else {
                        io.append_history(server_line("you are not in a room"));
                        return Ok(());
                    };
                    let listing = state.rooms[name].players.join(" ");
                    io.append_history(server_line(&listing));
                    Ok(())
                },
            ),
        );

        let state = client.clone();
        set.insert(
            "createRoom".to_string(),
            CommandSpec::simple(
                "create a new room and join it",
                ColorCode::Yellow,
                move |_a, io| {
                    let state = state.clone();
                    io.prompt_text(
                        "enter room name...",
                        Box::new(move |reply, io| {
                            let name = reply.trim().to_string();
                            if name.is_empty() {
                                io.append_error("room name cannot be empty");
                                return;
                            }
                            if state.borrow().rooms.contains_key(&name) {
                                io.append_error(&format!("room {name} already exists"));
                                return;
                            }
                            let state = state.clone();
                            io.prompt_select(
                                "room visibility...",
                                vec!["public".to_string(), "private".to_string()],
                                Box::new(move |choice, io| {
                                    let public = choice == 0;
                                    if public {
                                        prompt_max_players(state, name, true, String::new(), io);
                                        return;
                                    }
                                    let state2 = state.clone();
                                    io.prompt_text(
                                        "enter room password...",
                                        Box::new(move |password, io| {
                                            prompt_max_players(
                                                state2,
                                                name,
                                                false,
                                                password.to_string(),
                                                io,
                                            );
                                        }),
                                    );
                                }),
                            );
                        }),
                    );
                    Ok(())
                },
            ),
        );

        let state = client.clone();
        let complete_state = client.clone();
        set.insert(
            "joinRoom".to_string(),
            CommandSpec::simple(
                "join a room. usage: joinRoom [room name]",
                ColorCode::Yellow,
                move |args, io| {
                    let Some(name) = args.first().filter(|n| !n.is_empty()) else {
                        io.append_error("usage: joinRoom [room name]");
                        return Ok(());
                    };
                    let name = name.to_string();
                    let (exists, full, password) = {
                        let state = state.borrow();
                        match state.rooms.get(&name) {
                            None => (false, false, String::new()),
                            Some(room) => (
                                true,
                                room.players.len() >= room.max_players,
                                room.password.clone(),
                            ),
                        }
                    };
                    if !exists {
                        io.append_history(server_line(&format!("room {name} doesn't exist")));
                        return Ok(());
                    }
                    if full {
                        io.append_history(server_line(&format!("room {name} is full")));
                        return Ok(());
                    }
                    if password.is_empty() {
                        state.borrow_mut().join_room(&name);
                        io.append_history(server_line(&format!("joined room {name}")));
                        return Ok(());
                    }
                    let state = state.clone();
                    io.prompt_text(
                        "enter room password...",
                        Box::new(move |reply, io| {
                            if reply == password {
                                state.borrow_mut().join_room(&name);
                                io.append_history(server_line(&format!("joined room {name}")));
                            } else {
                                io.append_history(server_line("incorrect password"));
                            }
                        }),
                    );
                    Ok(())
                },
            )
            .with_complete(move |_args| {
                complete_state.borrow().rooms.keys().cloned().collect()
            }),
        );

        let state = client.clone();
        set.insert(
            "roll".to_string(),
            CommandSpec::simple("roll the dice", ColorCode::Yellow, move |_a, io| {
                let mut state = state.borrow_mut();
                if state.current_room.is_none() {
                    io.append_history(server_line("you are not in a room"));
                    return Ok(());
                }
                let first = state.rng.random_range(1..=6);
                let second = state.rng.random_range(1..=6);
                io.append_history(server_line(&format!(
                    "you rolled a {first} and a {second}"
                )));
                Ok(())
            }),
        );

        let state = client.clone();
        set.insert(
            "leave".to_string(),
            CommandSpec::simple("leave the current room", ColorCode::Yellow, move |_a, io| {
                match state.borrow_mut().leave_room() {
                    Some(name) => io.append_history(server_line(&format!("left room {name}"))),
                    None => io.append_history(server_line("you are not in a room")),
                }
                Ok(())
            }),
        );

        set
    }

    fn quit(&self, ctx: Box<dyn Any>, _io: &mut Io<'_>) {
        if let Ok(client) = ctx.downcast::<Client>() {
            let client = client.borrow();
            info!("dice game disconnected from {}:{}", client.address, client.port);
        }
    }
}

/// The dice game contribution to the root command set.
pub fn command_set() -> CommandSet {
    let mut set = CommandSet::new();
    set.insert(
        "diceGame".to_string(),
        CommandSpec::spawn(
            "plays the dicegame! optionally pass server address and port: diceGame [address] [port]",
            ColorCode::Yellow,
            Rc::new(DiceGame),
        ),
    );
    set
}
