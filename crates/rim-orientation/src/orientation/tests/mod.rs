mod common;
mod matching;
mod scoring;
