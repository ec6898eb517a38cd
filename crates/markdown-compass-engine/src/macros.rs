/// Declares a function returning a lazily compiled, process-wide regex.
macro_rules! pattern {
    ($(#[$doc:meta])* $vis:vis $name:ident, $re:expr) => {
        $(#[$doc])*
        $vis fn $name() -> &'static ::regex::Regex {
            static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            RE.get_or_init(|| {
                ::regex::Regex::new($re).expect(concat!("Invalid ", stringify!($name), " regex"))
            })
        }
    };
}
