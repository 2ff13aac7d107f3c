mod concurrency;
mod format;
