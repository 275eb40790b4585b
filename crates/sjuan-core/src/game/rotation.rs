use crate::model::player::Player;

/// First seat after `from`, wrapping, whose player still holds cards.
pub fn next_seat_with_cards(players: &[Player], from: usize) -> Option<usize> {
    let count = players.len();
    (1..=count)
        .map(|step| (from + step) % count)
        .find(|&seat| players[seat].has_cards())
}

/// First seat before `from`, wrapping, whose player still holds cards.
pub fn previous_seat_with_cards(players: &[Player], from: usize) -> Option<usize> {
    let count = players.len();
    (1..=count)
        .map(|step| (from + count - step) % count)
        .find(|&seat| players[seat].has_cards())
}
