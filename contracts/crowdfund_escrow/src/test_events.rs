extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, String, Symbol, TryIntoVal,
};

use crate::events::{
    ContributionReceived, CreatorPaid, OppositionRecorded, ProjectConfigured, RefundPaid,
    StateChanged,
};
use crate::test::FakeIssuer;
use crate::types::ProjectState;
use crate::{ProjectEscrow, ProjectEscrowClient, WorkSubmission};

const SEVEN_DAYS: u64 = 7 * 24 * 60 * 60;
const START: u64 = 1_600_000_000;

struct Fixture {
    env: Env,
    client: ProjectEscrowClient<'static>,
    creator: Address,
    backer1: Address,
    backer2: Address,
}

fn fixture() -> Fixture {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = START);

    let contract_id = env.register(ProjectEscrow, ());
    let client = ProjectEscrowClient::new(&env, &contract_id);

    let creator = Address::generate(&env);
    let backer1 = Address::generate(&env);
    let backer2 = Address::generate(&env);

    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin.clone());
    let sac_client = token::StellarAssetClient::new(&env, &sac.address());
    sac_client.mint(&backer1, &10_000i128);
    sac_client.mint(&backer2, &10_000i128);

    let issuer = env.register(FakeIssuer, ());

    client.configure(
        &creator,
        &String::from_str(&env, "Field Recorder MkII"),
        &String::from_str(&env, "Three production videos"),
        &sac.address(),
        &(START + SEVEN_DAYS),
    );
    client.set_nft_info(
        &String::from_str(&env, "Field Recorder MkII"),
        &String::from_str(&env, "FRII"),
        &String::from_str(&env, "https://example.com/nft-uri?id="),
        &10i128,
        &100u32,
        &0u32,
        &issuer,
    );

    Fixture {
        env,
        client,
        creator,
        backer1,
        backer2,
    }
}

fn submit(f: &Fixture) {
    f.client.submit_work(
        &f.creator,
        &WorkSubmission {
            name: String::from_str(&f.env, "Analysis video"),
            description: String::from_str(&f.env, "Final cut"),
            url: String::from_str(&f.env, "https://example.com/work/1"),
        },
    );
}

#[test]
fn test_configured_event() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = START);
    let contract_id = env.register(ProjectEscrow, ());
    let client = ProjectEscrowClient::new(&env, &contract_id);
    let creator = Address::generate(&env);
    let token_addr = Address::generate(&env);

    client.configure(
        &creator,
        &String::from_str(&env, "p"),
        &String::from_str(&env, "p"),
        &token_addr,
        &(START + SEVEN_DAYS),
    );

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, Symbol::new(&env, "configured").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let data: ProjectConfigured = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        data,
        ProjectConfigured {
            creator,
            submission_deadline: START + SEVEN_DAYS,
        }
    );
}

#[test]
fn test_contribution_event() {
    let f = fixture();
    f.client.contribute(&f.backer1, &10);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, f.client.address);
    let expected_topics = vec![&f.env, symbol_short!("contrib").into_val(&f.env)];
    assert_eq!(last_event.1, expected_topics);

    let data: ContributionReceived = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        data,
        ContributionReceived {
            backer: f.backer1.clone(),
            units: 10,
            value: 100,
        }
    );
}

#[test]
fn test_first_opposition_emits_transition_and_vote() {
    let f = fixture();
    f.client.contribute(&f.backer1, &10);
    f.client.contribute(&f.backer2, &10);
    submit(&f);

    f.client.oppose_work(&f.backer1);

    let all_events = f.env.events().all();
    // Vote event last, preceded by the WorkSubmitted → InAppeal transition.
    let vote_event = all_events.last().expect("No events found");
    let expected_topics = vec![&f.env, symbol_short!("opposed").into_val(&f.env)];
    assert_eq!(vote_event.1, expected_topics);
    let vote: OppositionRecorded = vote_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        vote,
        OppositionRecorded {
            backer: f.backer1.clone(),
            weight: 100,
            opposing_value: 100,
        }
    );

    let state_event = all_events.get(all_events.len() - 2).unwrap();
    let expected_topics = vec![&f.env, symbol_short!("state").into_val(&f.env)];
    assert_eq!(state_event.1, expected_topics);
    let change: StateChanged = state_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        change,
        StateChanged {
            from: ProjectState::WorkSubmitted,
            to: ProjectState::InAppeal,
        }
    );
}

#[test]
fn test_refund_event() {
    let f = fixture();
    f.client.contribute(&f.backer1, &10);
    f.client.contribute(&f.backer2, &10);
    submit(&f);
    f.client.oppose_work(&f.backer1);
    f.client.oppose_work(&f.backer2);

    f.client.get_refund(&f.backer1);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![&f.env, symbol_short!("refund").into_val(&f.env)];
    assert_eq!(last_event.1, expected_topics);
    let data: RefundPaid = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        data,
        RefundPaid {
            backer: f.backer1.clone(),
            amount: 50,
        }
    );
}

#[test]
fn test_payout_event_on_success_settlement() {
    let f = fixture();
    f.client.contribute(&f.backer1, &10);
    f.client.contribute(&f.backer2, &10);
    submit(&f);
    f.env.ledger().with_mut(|li| li.timestamp += SEVEN_DAYS + 1);

    f.client.check_if_funding_complete_or_expired();

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![&f.env, symbol_short!("payout").into_val(&f.env)];
    assert_eq!(last_event.1, expected_topics);
    let data: CreatorPaid = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(data, CreatorPaid { amount: 200 });
}
