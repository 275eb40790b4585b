use crate::error::GameError;
use crate::game::rotation::{next_seat_with_cards, previous_seat_with_cards};
use crate::model::action::Action;
use crate::model::board::{Board, BoardMatrix};
use crate::model::card::Card;
use crate::model::deck::{DECK_SIZE, Deck};
use crate::model::player::{Player, PlayerInfo};
use crate::model::turn::Turn;
use crate::policy::{HeuristicPolicy, Policy, PolicyContext};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, event};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = DECK_SIZE;

/// A single game of Sjuan.
///
/// `current` is the seat the rotation is on; board-mutating plays apply to it.
/// During a take/give handoff the turn names the giver while `current` stays
/// with the taker, so the rotation resumes from the taker's seat.
pub struct Game {
    roster: Vec<PlayerInfo>,
    players: Vec<Player>,
    current: usize,
    turn: Option<Turn>,
    finished: Vec<usize>,
    deck: Deck,
    board: Board,
    policy: Box<dyn Policy>,
    rng: StdRng,
}

impl Game {
    pub fn new(roster: Vec<PlayerInfo>) -> Result<Self, GameError> {
        Self::with_rng(roster, StdRng::from_entropy())
    }

    pub fn with_seed(roster: Vec<PlayerInfo>, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(roster, StdRng::seed_from_u64(seed))
    }

    fn with_rng(roster: Vec<PlayerInfo>, rng: StdRng) -> Result<Self, GameError> {
        validate_roster(&roster)?;
        let mut game = Self {
            roster,
            players: Vec::new(),
            current: 0,
            turn: None,
            finished: Vec::new(),
            deck: Deck::standard(),
            board: Board::new(),
            policy: Box::new(HeuristicPolicy::new()),
            rng,
        };
        game.reset();
        Ok(game)
    }

    /// Replaces the policy that resolves `PlayerKind::Ai` seats.
    pub fn with_policy(mut self, policy: Box<dyn Policy>) -> Self {
        self.policy = policy;
        self
    }

    /// Builds a mid-game position. Seats with empty hands count as already
    /// finished, in seat order. The turn belongs to `current` (or the next seat
    /// holding cards) under the usual rotation rule.
    pub fn from_position(
        roster: Vec<PlayerInfo>,
        hands: Vec<Vec<Card>>,
        placed: &[Card],
        current: usize,
    ) -> Result<Self, GameError> {
        validate_roster(&roster)?;
        if hands.len() != roster.len() || current >= roster.len() {
            return Err(GameError::InvalidRoster {
                count: hands.len(),
            });
        }

        let players: Vec<Player> = roster
            .iter()
            .cloned()
            .zip(hands)
            .map(|(info, cards)| {
                let mut player = Player::new(info);
                for card in cards {
                    player.add_card(card);
                }
                player
            })
            .collect();
        let finished = players
            .iter()
            .enumerate()
            .filter(|(_, player)| !player.has_cards())
            .map(|(seat, _)| seat)
            .collect();

        let mut game = Self {
            roster,
            players,
            current,
            turn: None,
            finished,
            deck: Deck::empty(),
            board: Board::from_placed(placed),
            policy: Box::new(HeuristicPolicy::new()),
            rng: StdRng::from_entropy(),
        };

        if game.is_finished() {
            return Ok(game);
        }
        if !game.players[current].has_cards() {
            game.advance_player()?;
        }
        game.turn = Some(game.rotation_turn()?);
        game.resolve_automated_turns()?;
        Ok(game)
    }

    /// Fresh hands, deck and board. No turn until `start`.
    pub fn reset(&mut self) {
        self.players = self.roster.iter().cloned().map(Player::new).collect();
        self.finished.clear();
        self.current = 0;
        self.turn = None;
        self.deck = Deck::standard();
        self.board = Board::new();
    }

    /// Resets, shuffles, deals and hands the opening to the seven of hearts.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.reset();
        self.deck.shuffle_in_place(&mut self.rng);
        self.deal_cards()?;

        let opener = self
            .players
            .iter()
            .position(|player| player.has_card(Card::SEVEN_OF_HEARTS))
            .ok_or(GameError::CardNotFound(Card::SEVEN_OF_HEARTS))?;
        self.current = opener;
        self.turn = Some(Turn::new(opener, [Action::PlayCard(Card::SEVEN_OF_HEARTS)])?);

        event!(
            target: "sjuan_core::game",
            Level::DEBUG,
            players = self.players.len(),
            opener,
            "game started"
        );

        self.resolve_automated_turns()
    }

    fn deal_cards(&mut self) -> Result<(), GameError> {
        let mut seat = 0;
        while !self.deck.is_empty() {
            let card = self.deck.deal()?;
            self.players[seat].add_card(card);
            seat = (seat + 1) % self.players.len();
        }
        Ok(())
    }

    /// Applies a legal action, then resolves every automated turn that follows.
    pub fn execute(&mut self, action: Action) -> Result<(), GameError> {
        let turn = self.turn.as_ref().ok_or(GameError::NotStarted)?;
        if !turn.contains(&action) {
            return Err(GameError::InvalidAction(action));
        }
        self.apply(action)?;
        self.resolve_automated_turns()
    }

    fn resolve_automated_turns(&mut self) -> Result<(), GameError> {
        while let Some(turn) = self.turn.as_ref() {
            if !self.players[turn.player()].kind().is_automated() {
                break;
            }
            let board = self.board.snapshot();
            let ctx = PolicyContext {
                board: &board,
                turn,
            };
            let action = self.policy.choose_action(&ctx)?;
            if !turn.contains(&action) {
                return Err(GameError::InvalidAction(action));
            }
            self.apply(action)?;
        }
        Ok(())
    }

    fn apply(&mut self, action: Action) -> Result<(), GameError> {
        let actor = self.turn.as_ref().ok_or(GameError::NotStarted)?.player();

        match action {
            Action::PlayCard(card) => self.play_card(card)?,
            Action::PlayAllCards => self.play_all_cards()?,
            Action::GiveCard(card) => self.give_card(actor, card)?,
            Action::TakeCard | Action::PassTurn => {}
        }

        event!(
            target: "sjuan_core::game",
            Level::DEBUG,
            seat = actor,
            player = self.players[actor].name(),
            action = %action,
            hand_size = self.players[actor].card_count(),
        );

        if action.sheds_cards()
            && !self.players[actor].has_cards()
            && !self.finished.contains(&actor)
        {
            self.finished.push(actor);
            event!(
                target: "sjuan_core::game",
                Level::INFO,
                seat = actor,
                player = self.players[actor].name(),
                position = self.finished.len(),
                "player finished"
            );
        }

        if self.is_finished() {
            self.turn = None;
            event!(
                target: "sjuan_core::game",
                Level::INFO,
                winner = self.players[self.finished[0]].name(),
                "game finished"
            );
            return Ok(());
        }

        let next = match action {
            Action::PlayCard(card) => self.continuation_turn(card)?,
            Action::TakeCard => self.handoff_turn()?,
            Action::PlayAllCards | Action::GiveCard(_) | Action::PassTurn => {
                self.advance_player()?;
                self.rotation_turn()?
            }
        };
        self.turn = Some(next);
        Ok(())
    }

    fn play_card(&mut self, card: Card) -> Result<(), GameError> {
        let seat = self.current;
        if !self.players[seat].has_card(card) || !self.board.is_valid(card) {
            return Err(GameError::InvalidCard(card));
        }
        self.players[seat].remove_card(card)?;
        self.board.place(card)
    }

    fn play_all_cards(&mut self) -> Result<(), GameError> {
        let seat = self.current;
        let hand = self.players[seat].hand_cards();
        if let Some(&blocked) = hand.iter().find(|&&card| !self.board.is_valid(card)) {
            return Err(GameError::InvalidCard(blocked));
        }
        // Each card was valid against the board as it stood, and none depends
        // on another, so placement order does not matter.
        for card in hand {
            self.players[seat].remove_card(card)?;
            self.board.place(card)?;
        }
        Ok(())
    }

    fn give_card(&mut self, giver: usize, card: Card) -> Result<(), GameError> {
        if !self.players[giver].has_card(card) {
            return Err(GameError::InvalidCard(card));
        }
        self.players[giver].remove_card(card)?;
        self.players[self.current].add_card(card);
        Ok(())
    }

    /// After a play: Ace or King with something still playable earns another choice.
    fn continuation_turn(&self, played: Card) -> Result<Turn, GameError> {
        let seat = self.current;
        let hand = self.players[seat].hand_cards();
        let valid = self.board.valid_subset(&hand);

        if !played.rank.is_bonus() || valid.is_empty() {
            return Turn::new(seat, [Action::PassTurn]);
        }

        let mut actions: Vec<Action> = valid.iter().copied().map(Action::PlayCard).collect();
        if valid.len() == hand.len() {
            actions.push(Action::PlayAllCards);
        }
        actions.push(Action::PassTurn);
        Turn::new(seat, actions)
    }

    /// After a take: the nearest earlier seat holding cards must give one up.
    fn handoff_turn(&self) -> Result<Turn, GameError> {
        let giver = previous_seat_with_cards(&self.players, self.current)
            .ok_or(GameError::NoPlayersWithCards)?;
        Turn::new(
            giver,
            self.players[giver]
                .hand()
                .iter()
                .copied()
                .map(Action::GiveCard),
        )
    }

    fn advance_player(&mut self) -> Result<(), GameError> {
        self.current = next_seat_with_cards(&self.players, self.current)
            .ok_or(GameError::NoPlayersWithCards)?;
        Ok(())
    }

    /// Regular turn for the seat the rotation is on.
    fn rotation_turn(&self) -> Result<Turn, GameError> {
        let seat = self.current;
        let hand = self.players[seat].hand_cards();
        let valid = self.board.valid_subset(&hand);

        if valid.is_empty() {
            return Turn::new(seat, [Action::TakeCard]);
        }

        let mut actions: Vec<Action> = valid.iter().copied().map(Action::PlayCard).collect();
        if valid.len() == hand.len() {
            actions.push(Action::PlayAllCards);
        }
        Turn::new(seat, actions)
    }

    pub fn current_turn(&self) -> Option<&Turn> {
        self.turn.as_ref()
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        self.turn.as_ref().map(Turn::to_vec).unwrap_or_default()
    }

    /// Seat the rotation is on.
    pub fn current_seat(&self) -> usize {
        self.current
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_snapshot(&self) -> BoardMatrix {
        self.board.snapshot()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_finished(&self) -> bool {
        !self.players.is_empty() && self.finished.len() == self.players.len()
    }

    /// Players in the order their hands ran out.
    pub fn finish_order(&self) -> Vec<&Player> {
        self.finished.iter().map(|&seat| &self.players[seat]).collect()
    }

    pub fn finish_seats(&self) -> &[usize] {
        &self.finished
    }

    /// 1-based finishing position of a seat, if it has finished.
    pub fn finish_position(&self, seat: usize) -> Option<usize> {
        self.finished
            .iter()
            .position(|&finished| finished == seat)
            .map(|index| index + 1)
    }
}

fn validate_roster(roster: &[PlayerInfo]) -> Result<(), GameError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&roster.len()) {
        return Err(GameError::InvalidRoster {
            count: roster.len(),
        });
    }
    Ok(())
}
