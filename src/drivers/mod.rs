mod in_memory_test;
mod mysql_async;

pub use self::in_memory_test::{InMemoryTestDriver, InMemoryTestResponseBuilder};
pub use self::mysql_async::MysqlAsyncDriver;
