mod chunking;
mod helpers;
mod measurement;
mod scrolling;
mod streaming;
