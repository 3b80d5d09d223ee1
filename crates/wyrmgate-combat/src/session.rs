//! Combat session actor: an isolated Tokio task that owns one encounter.
//!
//! Each session runs in its own task and talks to the outside world through
//! an mpsc command channel — no shared mutable state, just message passing.
//! The channel serializes every mutation, so two racing admissions or a
//! burst of actions from several connections are applied one at a time, in
//! the order the transport delivered them.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use wyrmgate_protocol::{
    BattlefieldSeed, CombatAction, CombatEvent, CombatSnapshot, PlayerId,
    SessionId, Square,
};

use crate::{SessionError, SessionEvent, SessionEventSender};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// The lifecycle state of a combat session.
///
/// ```text
/// Pending ──(GM start)──→ Active ──(GM end)──→ Finished
///    └──────────────(GM end: cancel)─────────────↗
/// ```
///
/// - **Pending**: created, waiting for the game master to start it.
///   Connections may already attach.
/// - **Active**: the encounter is running; turns and rounds advance.
/// - **Finished**: terminal. The actor emits its ended event and stops;
///   the registry entry is removed by the event consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Active,
    Finished,
}

impl SessionStatus {
    /// Returns `true` while the encounter is running.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Active => write!(f, "Active"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

// ---------------------------------------------------------------------------
// Handle-side types
// ---------------------------------------------------------------------------

/// Channel sender for delivering session events to one player's connection.
pub type PlayerSender = mpsc::UnboundedSender<CombatEvent>;

/// A snapshot of session metadata for observers (lobby overview).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: SessionId,
    pub nickname: String,
    pub status: SessionStatus,
    pub round_count: u32,
    /// Players with a live connection right now.
    pub connected: Vec<PlayerId>,
}

impl SessionInfo {
    /// Returns `true` while the encounter is running.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Commands sent to a session actor through its channel.
pub(crate) enum SessionCommand {
    /// Record a live connection for a player and start delivering events.
    Attach {
        player: PlayerId,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },

    /// Release a player's connection slot (socket closed).
    Detach { player: PlayerId },

    /// Does this player currently have a live connection?
    IsAttached {
        player: PlayerId,
        reply: oneshot::Sender<bool>,
    },

    /// An action from an admitted connection.
    Action {
        player: PlayerId,
        action: CombatAction,
    },

    /// Request session metadata.
    GetInfo {
        reply: oneshot::Sender<SessionInfo>,
    },
}

/// Handle to a running session actor. Cheap to clone — an id plus an
/// `mpsc::Sender`. The registry holds one per session; admission and the
/// lobby overview clone it out.
///
/// Every operation fails with [`SessionError::SessionGone`] once the actor
/// has stopped, which is how callers distinguish a live session from one
/// whose teardown has begun but whose registry entry still lingers.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Returns the session's identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    fn gone(&self) -> SessionError {
        SessionError::SessionGone(self.id.clone())
    }

    /// Attaches a live connection for `player`.
    ///
    /// The caller has already authenticated and checked for duplicates, but
    /// the actor re-checks both roster membership and the connection slot:
    /// of two racing admissions for the same player, exactly one attaches.
    pub async fn attach(
        &self,
        player: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Attach {
                player,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.gone())?;
        reply_rx.await.map_err(|_| self.gone())?
    }

    /// Releases `player`'s connection slot so a later admission attempt (a
    /// reconnect) succeeds. Never advances the session lifecycle.
    pub async fn detach(&self, player: PlayerId) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Detach { player })
            .await
            .map_err(|_| self.gone())
    }

    /// Returns `true` if `player` currently has a live connection.
    ///
    /// Roster membership alone doesn't count: a roster member who never
    /// connected is not in combat.
    pub async fn is_player_in_combat(
        &self,
        player: PlayerId,
    ) -> Result<bool, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::IsAttached {
                player,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.gone())?;
        reply_rx.await.map_err(|_| self.gone())
    }

    /// Delivers an action from `player` (fire-and-forget). Invalid actions
    /// are rejected inside the actor and reported to the offending
    /// connection only.
    pub async fn action(
        &self,
        player: PlayerId,
        action: CombatAction,
    ) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Action { player, action })
            .await
            .map_err(|_| self.gone())
    }

    /// Requests current session metadata.
    pub async fn info(&self) -> Result<SessionInfo, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| self.gone())?;
        reply_rx.await.map_err(|_| self.gone())
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The internal session state. Runs inside a Tokio task.
struct SessionActor {
    id: SessionId,
    nickname: String,
    gm_id: PlayerId,
    /// Participants in turn order. The game master is a participant only if
    /// the creator listed them here.
    roster: Vec<PlayerId>,
    seed: BattlefieldSeed,
    status: SessionStatus,
    round_count: u32,
    /// Index into `roster` of whose turn it is.
    turn_index: usize,
    /// Live connections: at most one per player.
    connections: HashMap<PlayerId, PlayerSender>,
    events: SessionEventSender,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    /// Runs the actor loop until the encounter finishes or every handle is
    /// dropped.
    async fn run(mut self) {
        tracing::info!(session_id = %self.id, "combat session started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Attach {
                    player,
                    sender,
                    reply,
                } => {
                    let result = self.handle_attach(player, sender);
                    let _ = reply.send(result);
                }
                SessionCommand::Detach { player } => {
                    self.handle_detach(&player);
                }
                SessionCommand::IsAttached { player, reply } => {
                    let _ =
                        reply.send(self.connections.contains_key(&player));
                }
                SessionCommand::Action { player, action } => {
                    self.handle_action(player, action);
                    if self.status == SessionStatus::Finished {
                        break;
                    }
                }
                SessionCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        // Reached on Finished or when the registry itself was dropped.
        let _ = self.events.send(SessionEvent::Ended {
            id: self.id.clone(),
        });
        tracing::info!(session_id = %self.id, "combat session stopped");
    }

    fn handle_attach(
        &mut self,
        player: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), SessionError> {
        if player != self.gm_id && !self.roster.contains(&player) {
            return Err(SessionError::NotInRoster(player));
        }
        if self.connections.contains_key(&player) {
            return Err(SessionError::AlreadyAttached(player));
        }

        self.connections.insert(player.clone(), sender);
        // The new connection gets a full snapshot first, so a reconnecting
        // client can rebuild its view before any incremental events arrive.
        self.send_to(&player, CombatEvent::Snapshot(self.snapshot()));
        tracing::info!(
            session_id = %self.id,
            %player,
            connected = self.connections.len(),
            "connection attached"
        );

        self.broadcast_except(
            &player,
            CombatEvent::PlayerAttached { player: player.clone() },
        );
        Ok(())
    }

    fn handle_detach(&mut self, player: &PlayerId) {
        if self.connections.remove(player).is_none() {
            return;
        }
        tracing::info!(
            session_id = %self.id,
            %player,
            connected = self.connections.len(),
            "connection detached"
        );
        self.broadcast(CombatEvent::PlayerDetached {
            player: player.clone(),
        });
    }

    fn handle_action(&mut self, player: PlayerId, action: CombatAction) {
        if !self.connections.contains_key(&player) {
            // Stale command from a connection that already detached.
            tracing::warn!(
                session_id = %self.id,
                %player,
                "action from unattached player, ignoring"
            );
            return;
        }

        let result = match action {
            CombatAction::Start => self.handle_start(&player),
            CombatAction::End => self.handle_end(&player),
            CombatAction::Move { pawn, to } => {
                self.handle_move(&player, pawn, to)
            }
            CombatAction::EndTurn => self.handle_end_turn(&player),
        };

        if let Err(reason) = result {
            tracing::debug!(
                session_id = %self.id,
                %player,
                %reason,
                "action rejected"
            );
            self.send_to(&player, CombatEvent::ActionRejected { reason });
        }
    }

    fn handle_start(&mut self, player: &PlayerId) -> Result<(), String> {
        if *player != self.gm_id {
            return Err("only the game master may start the encounter".into());
        }
        if self.status != SessionStatus::Pending {
            return Err(format!(
                "cannot start an encounter that is {}",
                self.status
            ));
        }

        self.status = SessionStatus::Active;
        self.turn_index = 0;
        tracing::info!(session_id = %self.id, "encounter started");
        self.broadcast(CombatEvent::CombatStarted);
        Ok(())
    }

    fn handle_end(&mut self, player: &PlayerId) -> Result<(), String> {
        if *player != self.gm_id {
            return Err("only the game master may end the encounter".into());
        }

        // Ending from Pending is the organizer-cancel path.
        self.status = SessionStatus::Finished;
        tracing::info!(
            session_id = %self.id,
            rounds = self.round_count,
            "encounter ended"
        );
        self.broadcast(CombatEvent::CombatEnded);
        Ok(())
    }

    fn handle_move(
        &mut self,
        player: &PlayerId,
        pawn: Square,
        to: Square,
    ) -> Result<(), String> {
        if self.status != SessionStatus::Active {
            return Err("the encounter is not active".into());
        }
        let Some(occupant) = self.seed.field_pawns.get(&pawn) else {
            return Err(format!("no pawn on square {pawn}"));
        };
        if !occupant.owner.grants(player) {
            return Err(format!("pawn on {pawn} is not yours to command"));
        }
        if self.seed.field_pawns.contains_key(&to) {
            return Err(format!("square {to} is occupied"));
        }

        let moved = self
            .seed
            .field_pawns
            .remove(&pawn)
            .expect("occupancy checked above");
        self.seed.field_pawns.insert(to.clone(), moved);

        self.broadcast(CombatEvent::PawnMoved { from: pawn, to });
        Ok(())
    }

    fn handle_end_turn(&mut self, player: &PlayerId) -> Result<(), String> {
        if self.status != SessionStatus::Active {
            return Err("the encounter is not active".into());
        }
        let Some(current) = self.roster.get(self.turn_index) else {
            return Err("this encounter has no turn order".into());
        };
        if current != player {
            return Err("not your turn".into());
        }

        self.turn_index += 1;
        if self.turn_index >= self.roster.len() {
            // The turn cursor wrapped: one full round of turns completed.
            self.turn_index = 0;
            self.round_count += 1;
        }
        let next = self.roster[self.turn_index].clone();

        self.broadcast(CombatEvent::TurnEnded {
            player: player.clone(),
            next,
        });
        if self.turn_index == 0 {
            tracing::debug!(
                session_id = %self.id,
                round = self.round_count,
                "round completed"
            );
            self.broadcast(CombatEvent::RoundAdvanced {
                round: self.round_count,
            });
        }
        Ok(())
    }

    fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot {
            nickname: self.nickname.clone(),
            active: self.status.is_active(),
            round: self.round_count,
            current_turn: match self.status {
                SessionStatus::Active => {
                    self.roster.get(self.turn_index).cloned()
                }
                _ => None,
            },
            connected: self.connections.keys().cloned().collect(),
            field_pawns: self.seed.field_pawns.clone(),
        }
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            nickname: self.nickname.clone(),
            status: self.status,
            round_count: self.round_count,
            connected: self.connections.keys().cloned().collect(),
        }
    }

    /// Sends an event to every attached connection.
    fn broadcast(&self, event: CombatEvent) {
        for sender in self.connections.values() {
            let _ = sender.send(event.clone());
        }
    }

    /// Sends an event to every attached connection except `excluded`.
    fn broadcast_except(&self, excluded: &PlayerId, event: CombatEvent) {
        for (player, sender) in &self.connections {
            if player != excluded {
                let _ = sender.send(event.clone());
            }
        }
    }

    /// Sends an event to one player. Silently drops if their receiver is
    /// gone (the socket died and detach hasn't landed yet).
    fn send_to(&self, player: &PlayerId, event: CombatEvent) {
        if let Some(sender) = self.connections.get(player) {
            let _ = sender.send(event);
        }
    }
}

/// Spawns a session actor task and returns the handle to address it.
///
/// `channel_size` bounds the command channel — if a session falls behind,
/// senders wait rather than piling up unbounded.
pub(crate) fn spawn_session(
    id: SessionId,
    nickname: String,
    seed: BattlefieldSeed,
    gm_id: PlayerId,
    roster: Vec<PlayerId>,
    events: SessionEventSender,
    channel_size: usize,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = SessionActor {
        id: id.clone(),
        nickname,
        gm_id,
        roster,
        seed,
        status: SessionStatus::Pending,
        round_count: 0,
        turn_index: 0,
        connections: HashMap::new(),
        events,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle { id, sender: tx }
}
