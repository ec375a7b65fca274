//! The two-screen session: logged out (auth) or playing, with at most one live battle.

use crate::game::combat::Battle;
use crate::game::errors::GameError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    LoggedOut,
    Playing {
        username: String,
        battle: Option<Battle>,
    },
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to the game screen. Any previous session state is dropped.
    pub fn login(&mut self, username: &str) {
        *self = Session::Playing {
            username: username.to_ascii_lowercase(),
            battle: None,
        };
    }

    /// Back to the auth screen; an unfinished battle is discarded.
    pub fn logout(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Session::Playing { username, .. } => Some(username),
            Session::LoggedOut => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Session::Playing { .. })
    }

    pub fn username(&self) -> Result<&str, GameError> {
        match self {
            Session::Playing { username, .. } => Ok(username),
            Session::LoggedOut => Err(GameError::NotLoggedIn),
        }
    }

    pub fn battle(&self) -> Option<&Battle> {
        match self {
            Session::Playing { battle, .. } => battle.as_ref(),
            Session::LoggedOut => None,
        }
    }

    pub fn in_battle(&self) -> bool {
        self.battle().is_some()
    }

    /// Borrow the username and the live battle together.
    pub fn battle_mut(&mut self) -> Result<(&str, &mut Battle), GameError> {
        match self {
            Session::Playing {
                username,
                battle: Some(battle),
            } => Ok((username.as_str(), battle)),
            Session::Playing { battle: None, .. } => Err(GameError::NoActiveBattle),
            Session::LoggedOut => Err(GameError::NotLoggedIn),
        }
    }

    pub fn begin_battle(&mut self, new_battle: Battle) -> Result<(), GameError> {
        match self {
            Session::Playing { battle: Some(_), .. } => Err(GameError::BattleInProgress),
            Session::Playing { battle, .. } => {
                *battle = Some(new_battle);
                Ok(())
            }
            Session::LoggedOut => Err(GameError::NotLoggedIn),
        }
    }

    pub fn end_battle(&mut self) -> Option<Battle> {
        match self {
            Session::Playing { battle, .. } => battle.take(),
            Session::LoggedOut => None,
        }
    }
}
