//! QA tests for the full game flow using the headless API.
//!
//! These run entirely offline against the scripted stages and the mock
//! collaborator; no services are needed.
//! Run with: `cargo test -p pangyo-core --test qa_playthrough`

use pangyo_core::headless::{HeadlessConfig, HeadlessGame, StagePrompt};
use pangyo_core::items::{DICTIONARY_ID, EMAIL_HELPER_ID, MAGNIFIER_ID, WELCOME_KIT_ID};
use pangyo_core::stages::{ChatOutcome, EvalOutcome, Stage2, Stage4};
use pangyo_core::testing::{
    assert_has_item, assert_no_item, assert_stage, assert_stage_complete, TestHarness,
};

const PASSING_MAIL: &str = "안녕하세요, 8월 14일부터 18일까지 휴가 예정입니다. \
     부재중 백업은 김 매니저님이 맡아주시기로 했고, \
     급한 건은 슬랙으로 연락 부탁드립니다. 감사합니다!";

// =============================================================================
// OFFLINE PLAYTHROUGH
// =============================================================================

#[tokio::test]
async fn test_clean_offline_playthrough_collects_everything() {
    let mut game = HeadlessGame::new(HeadlessConfig::offline())
        .await
        .expect("offline game");

    game.choose(1).await.unwrap(); // stage 1
    game.choose(1).await.unwrap(); // stage 2 (scripted choice)
    game.say(PASSING_MAIL).await.unwrap(); // stage 3
    game.say("착수는 월요일로 확정, 시안은 금요일 공유, 팔로업은 슬랙.")
        .await
        .unwrap(); // stage 4

    assert!(game.is_finished());
    assert_eq!(game.prompt(), StagePrompt::Finished);
    for id in [DICTIONARY_ID, EMAIL_HELPER_ID, MAGNIFIER_ID, WELCOME_KIT_ID] {
        assert!(game.session().inventory().has(id), "missing {id}");
    }
    assert!(game.session().has_completed_all_stages());
}

#[tokio::test]
async fn test_wrong_answers_never_advance() {
    let mut game = HeadlessGame::new(HeadlessConfig::offline())
        .await
        .expect("offline game");

    for _ in 0..3 {
        game.choose(0).await.unwrap();
        assert_eq!(game.current_stage(), 1);
    }
    assert!(game.session().inventory().is_empty());
    assert!(game.session().progress().is_empty());

    game.choose(1).await.unwrap();
    assert_eq!(game.current_stage(), 2);
}

#[tokio::test]
async fn test_out_of_range_choice_is_harmless() {
    let mut game = HeadlessGame::new(HeadlessConfig::offline())
        .await
        .expect("offline game");
    let StagePrompt::Choices(choices) = game.prompt() else {
        panic!("expected choices");
    };

    game.choose(choices.len() + 5).await.unwrap();
    assert_eq!(game.current_stage(), 1);
    assert!(matches!(game.prompt(), StagePrompt::Choices(_)));
}

#[tokio::test]
async fn test_unlocks_fire_once_per_item() {
    let mut game = HeadlessGame::new(HeadlessConfig::offline())
        .await
        .expect("offline game");

    game.choose(1).await.unwrap();
    let unlock = game.take_unlock().expect("first stage unlock");
    assert_eq!(unlock.id, DICTIONARY_ID);
    assert!(game.take_unlock().is_none());
}

// =============================================================================
// MOCK COLLABORATOR FLOWS
// =============================================================================

#[test]
fn test_chat_stage_with_scripted_collaborator() {
    let mut harness = TestHarness::new();
    harness.session.go_to_next_stage();
    harness.settle_transition();
    assert_stage(&harness, 2);

    let mut stage = Stage2::new();
    stage.begin(&mut harness.session);

    harness.collaborator.queue_reply("언제부터 가능하세요?");
    harness
        .collaborator
        .queue_ending("좋아요, 그렇게 진행하죠!", true);

    assert_eq!(
        harness.chat_turn(&mut stage, "지금은 리소스가 풀이라 내일부터 가능해요."),
        ChatOutcome::Reply
    );
    assert_eq!(
        harness.chat_turn(&mut stage, "내일 오전에 정리해서 공유드릴게요."),
        ChatOutcome::Understood
    );
    assert_has_item(&harness, EMAIL_HELPER_ID);

    harness.settle_transition();
    assert_stage(&harness, 3);
    assert_stage_complete(&harness, 2);
}

#[test]
fn test_chat_failure_restarts_and_recovers() {
    let mut harness = TestHarness::new();
    harness.session.go_to_next_stage();
    harness.settle_transition();

    let mut stage = Stage2::new();
    stage.begin(&mut harness.session);

    harness.collaborator.queue_ending("음, 아쉬워요.", false);
    assert_eq!(
        harness.chat_turn(&mut stage, "네, 바로 하겠습니다!"),
        ChatOutcome::Restarted
    );
    assert_no_item(&harness, EMAIL_HELPER_ID);

    harness.collaborator.queue_ending("완벽해요!", true);
    assert_eq!(
        harness.chat_turn(&mut stage, "지금은 리소스가 풀이라 내일 공유드릴게요."),
        ChatOutcome::Understood
    );
    assert_has_item(&harness, EMAIL_HELPER_ID);
}

#[test]
fn test_minutes_below_threshold_then_above() {
    let mut harness = TestHarness::new();
    for _ in 0..3 {
        harness.session.go_to_next_stage();
        harness.settle_transition();
    }
    assert_stage(&harness, 4);

    let mut stage = Stage4::new(
        pangyo_core::stages::scripted_meeting(),
        pangyo_core::stages::EvalPolicy::Remote,
    );
    stage.begin(&mut harness.session);

    harness.collaborator.queue_evaluation(45, "핵심이 빠졌어요.");
    harness.collaborator.queue_evaluation(85, "훌륭해요!");

    assert_eq!(
        harness.submit_minutes(&mut stage, "회의를 했다."),
        EvalOutcome::Failed
    );
    assert_no_item(&harness, WELCOME_KIT_ID);
    assert!(!harness.session.game_finished());

    assert_eq!(
        harness.submit_minutes(&mut stage, "착수 월요일 확정, 시안 금요일, 팔로업 슬랙."),
        EvalOutcome::Passed
    );
    assert_has_item(&harness, WELCOME_KIT_ID);
    assert!(harness.session.game_finished());
    assert!(harness.session.has_completed_all_stages());
}

// =============================================================================
// REPLAY
// =============================================================================

#[tokio::test]
async fn test_replay_keeps_earlier_rewards() {
    let mut game = HeadlessGame::new(HeadlessConfig::offline())
        .await
        .expect("offline game");

    game.choose(1).await.unwrap();
    assert_eq!(game.current_stage(), 2);

    // Jump back and replay stage 1; the reward is already owned so the
    // unlock notification stays quiet.
    game.session_mut().set_stage(1).unwrap();
    let _ = game.take_unlock();
    assert!(game.session().inventory().has(DICTIONARY_ID));
    assert!(game.session().progress().is_complete(1));
}
