mod fixtures;
mod inventory;
