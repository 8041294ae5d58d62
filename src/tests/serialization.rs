use super::*;

#[test]
fn test_json_round_trip() {
    let board = board_from_moves(&[3, 3, 4, 0]);
    let ser = serde_json::to_string(&board).unwrap();
    let board1: Board = serde_json::from_str(&ser).unwrap();
    assert_eq!(board, board1);

    let config = MatchConfig {
        first_player_randomized: false,
        time_limit: Some(std::time::Duration::from_secs(90)),
    };
    let config1: MatchConfig = serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(config, config1);

    let status = GameStatus::Timeout {
        loser: PlayerId::PlayerSecond,
    };
    let status1: GameStatus = serde_json::from_str(&serde_json::to_string(&status).unwrap()).unwrap();
    assert_eq!(status, status1);
}
