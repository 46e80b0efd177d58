mod common;
mod construction;
mod queries;
mod refit;
mod scenarios;
