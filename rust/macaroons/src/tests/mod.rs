mod chain;
mod verifier;
