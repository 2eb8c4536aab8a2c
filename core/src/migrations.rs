pub const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS account_groups (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL UNIQUE,
      description TEXT DEFAULT '',
      color TEXT DEFAULT '#5B73DE',
      sort_order INTEGER DEFAULT 0,
      created_at TEXT DEFAULT CURRENT_TIMESTAMP,
      updated_at TEXT DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS accounts (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      platform TEXT NOT NULL,
      account_id TEXT,
      user_name TEXT NOT NULL,
      status INTEGER DEFAULT 0,
      cookie_file TEXT NOT NULL,
      group_id INTEGER DEFAULT NULL,
      avatar_url TEXT,
      local_avatar TEXT,
      followers_count INTEGER,
      videos_count INTEGER,
      bio TEXT,
      last_check_time TEXT DEFAULT CURRENT_TIMESTAMP,
      updated_at TEXT,
      FOREIGN KEY (group_id) REFERENCES account_groups(id) ON DELETE SET NULL
    );

    CREATE INDEX IF NOT EXISTS idx_accounts_platform ON accounts(platform);
    CREATE INDEX IF NOT EXISTS idx_accounts_group ON accounts(group_id);
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS message_threads (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      platform TEXT NOT NULL,
      account_id TEXT NOT NULL,
      user_id TEXT NOT NULL,
      user_name TEXT NOT NULL,
      user_avatar TEXT,
      unread_count INTEGER DEFAULT 0,
      last_message_time TEXT,
      last_sync_time TEXT,
      created_at TEXT DEFAULT CURRENT_TIMESTAMP,
      updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
      UNIQUE(platform, account_id, user_id)
    );

    CREATE TABLE IF NOT EXISTS messages (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      thread_id INTEGER NOT NULL,
      message_id TEXT,
      sender TEXT NOT NULL CHECK(sender IN ('me', 'user')),
      content_type TEXT NOT NULL CHECK(content_type IN ('text', 'image', 'mixed')),
      text_content TEXT,
      image_paths TEXT,
      timestamp TEXT NOT NULL,
      is_read INTEGER DEFAULT 0,
      created_at TEXT DEFAULT CURRENT_TIMESTAMP,
      FOREIGN KEY (thread_id) REFERENCES message_threads(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS platform_sync_status (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      platform TEXT NOT NULL,
      account_id TEXT NOT NULL,
      last_sync_time TEXT,
      sync_count INTEGER DEFAULT 0,
      last_error TEXT,
      updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
      UNIQUE(platform, account_id)
    );

    CREATE INDEX IF NOT EXISTS idx_message_threads_platform_account
      ON message_threads(platform, account_id);
    CREATE INDEX IF NOT EXISTS idx_message_threads_user ON message_threads(user_id);
    CREATE INDEX IF NOT EXISTS idx_message_threads_last_message_time
      ON message_threads(last_message_time);
    CREATE INDEX IF NOT EXISTS idx_messages_thread_id ON messages(thread_id);
    CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp);
    CREATE INDEX IF NOT EXISTS idx_messages_sender ON messages(sender);
    CREATE INDEX IF NOT EXISTS idx_sync_status_platform_account
      ON platform_sync_status(platform, account_id);
    "#,
    r#"
    ALTER TABLE messages ADD COLUMN content_hash TEXT;

    CREATE INDEX IF NOT EXISTS idx_messages_content_hash ON messages(content_hash);
    CREATE INDEX IF NOT EXISTS idx_messages_thread_hash
      ON messages(thread_id, content_hash);
    "#,
];
