pub use coursehub_models::{
    CreateUserDto, NewUser, SubscribeCourseDto, UpdateUserDto, User, UserChanges, UserRecord,
};
