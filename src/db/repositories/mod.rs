mod sessions;
mod settings;
