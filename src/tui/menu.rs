use crate::auth::{self, LoginFlow, LoginOutcome, RegistrationFlow};
use crate::pin::PasswordType;
use crate::session::{ExperimentMode, Session};
use crate::store::RegistrationStore;
use crate::terminal::{clear, print_error, print_success, reset_terminal};

use super::{
    confirm_screen, enter_prompt, get_editable_input, login_screen, print_help, print_main_menu,
    print_pool, print_status, status_lines,
};

pub fn gen_main_menu(session: &mut Session, store: &mut dyn RegistrationStore) {
    reset_terminal();
    clear();

    let mut print_invalid = false;

    loop {
        print_main_menu(session, &mut print_invalid);

        let input = match get_editable_input(enter_prompt(), "") {
            Some(s) => s,
            None => {
                clear();
                continue;
            }
        };

        match input.trim() {
            "1" => register(session, store),
            "2" => login(session, store),
            "3" => {
                clear();
                auth::logout(session);
                print_success("Logged out.");
            }
            "4" => {
                clear();
                let mode = match session.experiment_mode() {
                    ExperimentMode::On => ExperimentMode::Off,
                    ExperimentMode::Off => ExperimentMode::On,
                };
                session.set_experiment_mode(mode);
                print_success(&format!("Experiment mode: {}", mode));
            }
            "5" => {
                clear();
                let condition = match session.condition() {
                    PasswordType::Emoji => PasswordType::Digits,
                    PasswordType::Digits => PasswordType::Emoji,
                };
                session.set_condition(condition);
                print_success(&format!("Condition: {}", condition));
            }
            "6" => {
                clear();
                print_pool(&session.keypad_pool());
            }
            "7" => {
                clear();
                let latest = store.read_registration(None);
                print_status(&status_lines(session, store.kind(), latest.as_ref()));
            }
            "8" => {
                clear();
                print_help();
            }
            "9" | "q" => {
                clear();
                break;
            }
            "" => clear(),
            _ => {
                clear();
                print_invalid = true;
            }
        }
    }
}

fn register(session: &mut Session, store: &mut dyn RegistrationStore) {
    clear();
    let Some(participant) = get_editable_input("Participant ID", "") else {
        clear();
        return;
    };
    let Some(username) = get_editable_input("Username", "") else {
        clear();
        return;
    };
    let Some(kind) = get_editable_input("Password type (emoji/digits)", session.condition().as_str())
    else {
        clear();
        return;
    };

    let password_type: PasswordType = match kind.trim().parse() {
        Ok(t) => t,
        Err(e) => {
            clear();
            print_error(&e.to_string());
            return;
        }
    };

    let mut flow = RegistrationFlow::new();
    if let Err(e) = flow.generate(session, &participant, &username, password_type) {
        clear();
        print_error(&e.to_string());
        return;
    }

    let saved = confirm_screen(&mut flow, store);
    clear();
    match saved {
        Some(storage) => print_success(&format!("Registration saved to: {}", storage)),
        None => print_error("Registration cancelled, nothing saved."),
    }
}

fn login(session: &mut Session, store: &mut dyn RegistrationStore) {
    let mut flow = match LoginFlow::open(store, session, None) {
        Ok(f) => f,
        Err(e) => {
            clear();
            print_error(&e.to_string());
            return;
        }
    };

    let ok = login_screen(&mut flow, store, session);
    clear();
    if ok {
        print_success(&LoginOutcome::Success.message());
    }
}
