//! Meta progression saved between sessions: gold, experience and the shop
//! state of purchasable towers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use garden_core::balance::{BalanceTable, Loadout, TowerUnlock};

/// Meta gold granted to a brand new profile.
pub const STARTING_META_MONEY: i64 = 1000;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access save file: {0}")]
    Io(#[from] io::Error),

    #[error("save file is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("no shop item '{0}'")]
    NotForSale(String),

    #[error("not enough meta gold: need {price}, have {available}")]
    NotEnoughGold { price: i64, available: i64 },

    #[error("already unlocked")]
    AlreadyOwned,
}

/// Persistent player profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaProgress {
    pub meta_money: i64,
    pub xp: i64,
    /// Shop-item state only; towers without a shop price are always available.
    pub towers: Loadout,
}

impl Default for MetaProgress {
    fn default() -> Self {
        Self {
            meta_money: STARTING_META_MONEY,
            xp: 0,
            towers: Loadout::new(),
        }
    }
}

impl MetaProgress {
    /// A fresh profile: shop towers start locked, shop traps start with no stock.
    pub fn starting(balance: &BalanceTable) -> Self {
        let towers = balance
            .towers
            .iter()
            .filter(|(_, t)| t.shop_price.is_some())
            .map(|(key, t)| {
                let unlock = if t.is_trap {
                    TowerUnlock {
                        locked: false,
                        quantity: Some(0),
                    }
                } else {
                    TowerUnlock {
                        locked: true,
                        quantity: None,
                    }
                };
                (key.clone(), unlock)
            })
            .collect();
        Self {
            towers,
            ..Self::default()
        }
    }

    /// Read a profile. A missing file yields a fresh profile; saved entries
    /// override the fresh defaults and unknown tower keys are dropped.
    pub fn load(path: &Path, balance: &BalanceTable) -> Result<Self, PersistenceError> {
        let mut progress = Self::starting(balance);
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(progress),
            Err(err) => return Err(err.into()),
        };
        let saved: MetaProgress = serde_json::from_str(&json)?;

        progress.meta_money = saved.meta_money;
        progress.xp = saved.xp;
        for (key, unlock) in saved.towers {
            if let Some(slot) = progress.towers.get_mut(&key) {
                *slot = unlock;
            }
        }
        Ok(progress)
    }

    /// Like [`MetaProgress::load`], but an unreadable save falls back to a fresh
    /// profile. The bad file is first moved to [`backup_path`].
    pub fn load_or_default(path: &Path, balance: &BalanceTable) -> Self {
        match Self::load(path, balance) {
            Ok(progress) => progress,
            Err(err) => {
                let backup = backup_path(path);
                match fs::rename(path, &backup) {
                    Ok(()) => warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %err,
                        "unreadable save moved aside"
                    ),
                    Err(rename_err) => warn!(
                        path = %path.display(),
                        error = %err,
                        rename_error = %rename_err,
                        "unreadable save could not be moved aside"
                    ),
                }
                Self::starting(balance)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), meta_money = self.meta_money, "progress saved");
        Ok(())
    }

    /// Spend meta gold on a shop item. Traps gain one charge; other towers unlock.
    pub fn buy(&mut self, key: &str, balance: &BalanceTable) -> Result<(), ShopError> {
        let Some((tower, price)) = balance
            .tower(key)
            .and_then(|t| t.shop_price.map(|price| (t, price)))
        else {
            return Err(ShopError::NotForSale(key.to_string()));
        };
        if self.meta_money < price {
            return Err(ShopError::NotEnoughGold {
                price,
                available: self.meta_money,
            });
        }

        let slot = self.towers.entry(key.to_string()).or_default();
        if tower.is_trap {
            slot.locked = false;
            slot.quantity = Some(slot.quantity.unwrap_or(0) + 1);
        } else if slot.locked {
            slot.locked = false;
        } else {
            return Err(ShopError::AlreadyOwned);
        }
        self.meta_money -= price;
        info!(item = key, price, meta_money = self.meta_money, "shop purchase");
        Ok(())
    }

    /// Bank the rewards of a finished session.
    pub fn credit_session(&mut self, meta_gold: i64, xp: f64) {
        self.meta_money += meta_gold;
        self.xp += xp.floor() as i64;
    }
}

/// Where [`MetaProgress::load_or_default`] keeps an unreadable save: the same
/// file name with `.bak` appended.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
